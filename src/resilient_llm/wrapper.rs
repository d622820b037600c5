use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::{chat::ChatProvider, error::GradingError};

use super::config::ResilienceConfig;

/// Resilient wrapper that retries transient transport failures using
/// exponential backoff. Output that arrives but cannot be parsed is not its
/// concern and is never retried here.
pub struct ResilientLLM {
    pub(super) inner: Box<dyn ChatProvider>,
    pub(super) cfg: ResilienceConfig,
}

impl ResilientLLM {
    /// Creates a new resilient wrapper around an existing provider.
    pub fn new(inner: Box<dyn ChatProvider>, cfg: ResilienceConfig) -> Self {
        Self { inner, cfg }
    }

    pub(super) async fn retry<F, Fut, T>(&self, mut op: F) -> Result<T, GradingError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GradingError>>,
    {
        // The first attempt always runs.
        let max_attempts = self.cfg.max_attempts.max(1);
        let mut attempts_left = max_attempts;
        let mut idx = 0usize;
        let mut last_err: Option<GradingError> = None;

        while attempts_left > 0 {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !Self::is_retryable(&err) {
                        return Err(err);
                    }
                    if attempts_left == 1 {
                        last_err = Some(err);
                        break;
                    }
                    log::debug!("retrying after transient error (attempt {}): {err}", idx + 1);
                    last_err = Some(err);
                    self.backoff_sleep(idx).await;
                    attempts_left -= 1;
                    idx += 1;
                }
            }
        }

        Err(GradingError::RetryExceeded {
            attempts: max_attempts,
            last_error: last_err.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    fn is_retryable(err: &GradingError) -> bool {
        match err {
            GradingError::HttpError(_) => true,
            GradingError::ProviderError(_) => true,
            GradingError::AuthError(_) => false,
            GradingError::InvalidRequest(_) => false,
            GradingError::ParseError { .. } => false,
            GradingError::ConfigurationError(_) => false,
            GradingError::ConsensusFailure(_) => false,
            GradingError::RetryExceeded { .. } => false,
        }
    }

    async fn backoff_sleep(&self, attempt_index: usize) {
        let mut delay = self
            .cfg
            .base_delay_ms
            .saturating_mul(1u64 << attempt_index.min(16));
        delay = delay.min(self.cfg.max_delay_ms);
        if self.cfg.jitter {
            let span = (delay / 2).max(1);
            let jitter = ((attempt_index as u64)
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1))
                % span;
            delay = delay.saturating_sub(jitter);
        }
        sleep(Duration::from_millis(delay)).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use async_trait::async_trait;

    use super::*;
    use crate::chat::{ChatMessage, ChatResponse};

    #[derive(Debug)]
    struct TextResponse(String);

    impl std::fmt::Display for TextResponse {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl ChatResponse for TextResponse {
        fn text(&self) -> Option<String> {
            Some(self.0.clone())
        }
    }

    /// Fails with the error built by `fail` for the first `failures` calls.
    struct FlakyProvider {
        calls: Arc<AtomicUsize>,
        failures: usize,
        fail: fn() -> GradingError,
    }

    #[async_trait]
    impl ChatProvider for FlakyProvider {
        async fn chat(
            &self,
            _messages: &[ChatMessage],
        ) -> Result<Box<dyn ChatResponse>, GradingError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err((self.fail)());
            }
            Ok(Box::new(TextResponse("ok".to_string())))
        }
    }

    fn fast_config(max_attempts: usize) -> ResilienceConfig {
        ResilienceConfig {
            max_attempts,
            base_delay_ms: 1,
            max_delay_ms: 2,
            jitter: false,
        }
    }

    fn wrap(failures: usize, fail: fn() -> GradingError, attempts: usize) -> (ResilientLLM, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = FlakyProvider {
            calls: calls.clone(),
            failures,
            fail,
        };
        (ResilientLLM::new(Box::new(provider), fast_config(attempts)), calls)
    }

    fn messages() -> Vec<ChatMessage> {
        vec![ChatMessage::user().content("grade this").build()]
    }

    #[tokio::test]
    async fn recovers_from_transient_http_error() {
        let (llm, calls) = wrap(2, || GradingError::HttpError("reset".into()), 3);
        let response = llm.chat(&messages()).await.unwrap();
        assert_eq!(response.text().as_deref(), Some("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let (llm, calls) = wrap(10, || GradingError::ProviderError("503".into()), 2);
        let err = llm.chat(&messages()).await.unwrap_err();
        assert!(matches!(err, GradingError::RetryExceeded { attempts: 2, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_attempts_still_calls_once() {
        let (llm, calls) = wrap(0, || GradingError::HttpError("unused".into()), 0);
        let response = llm.chat(&messages()).await.unwrap();
        assert_eq!(response.text().as_deref(), Some("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let (llm, calls) = wrap(10, || GradingError::HttpError("reset".into()), 0);
        let err = llm.chat(&messages()).await.unwrap_err();
        match err {
            GradingError::RetryExceeded { attempts, last_error } => {
                assert_eq!(attempts, 1);
                assert!(last_error.contains("reset"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn auth_errors_are_not_retried() {
        let (llm, calls) = wrap(10, || GradingError::AuthError("bad key".into()), 5);
        let err = llm.chat(&messages()).await.unwrap_err();
        assert!(matches!(err, GradingError::AuthError(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
