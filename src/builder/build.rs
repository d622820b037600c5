use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::{
    backends::{openai::OpenAI, ModelConfig},
    chat::ChatProvider,
    error::GradingError,
    evaluator::{ChatEvaluator, ConsensusEvaluator},
    resilient_llm::{ResilienceConfig, ResilientLLM},
};

use super::backend::LLMBackend;
use super::llm_builder::LLMBuilder;
use super::state::BuilderState;

impl LLMBuilder {
    /// Builds the chat provider, wrapped for retries if requested.
    pub fn build(self) -> Result<Box<dyn ChatProvider>, GradingError> {
        let mut state = self.state;
        state.build_provider()
    }

    /// Builds the full grading stack: provider, single-shot evaluator and
    /// consensus evaluator.
    pub fn build_evaluator(self) -> Result<ConsensusEvaluator, GradingError> {
        let mut state = self.state;
        let samples = state.samples;
        let mode = state.execution_mode.unwrap_or_default();
        if samples == Some(0) {
            return Err(GradingError::InvalidRequest(
                "samples must be greater than 0".to_string(),
            ));
        }
        let system = state.system.take();
        let provider = state.build_provider()?;

        let mut single_shot = ChatEvaluator::new(provider);
        if let Some(system) = system {
            single_shot = single_shot.system(system);
        }
        let mut evaluator = ConsensusEvaluator::new(Arc::new(single_shot)).mode(mode);
        if let Some(samples) = samples {
            evaluator = evaluator.sample_count(samples);
        }
        Ok(evaluator)
    }
}

impl BuilderState {
    fn build_provider(&mut self) -> Result<Box<dyn ChatProvider>, GradingError> {
        self.log_state();
        let backend = self
            .backend
            .take()
            .ok_or_else(|| GradingError::InvalidRequest("No backend specified".to_string()))?;
        let config = self.model_config(backend)?;
        let provider: Box<dyn ChatProvider> = Box::new(OpenAI::new(config)?);
        self.wrap_with_resilience(provider)
    }

    fn model_config(&mut self, backend: LLMBackend) -> Result<ModelConfig, GradingError> {
        let api_key = self
            .api_key
            .take()
            .ok_or_else(|| GradingError::AuthError("No API key provided".to_string()))?;
        let mut config = ModelConfig::new(api_key.expose_secret().as_str());

        match (backend, self.base_url.take()) {
            (_, Some(url)) => config.base_url = url,
            (LLMBackend::OpenAICompatible, None) => {
                return Err(GradingError::ConfigurationError(
                    "OpenAI-compatible backend requires a base URL".to_string(),
                ))
            }
            (LLMBackend::OpenAI, None) => {}
        }
        if let Some(model) = self.model.take() {
            config.model = model;
        }
        if let Some(temperature) = self.temperature {
            config.temperature = Some(temperature);
        }
        if let Some(json_mode) = self.json_mode {
            config.json_mode = json_mode;
        }
        config.max_tokens = self.max_tokens;
        config.timeout_seconds = self.timeout_seconds;
        Ok(config)
    }

    fn wrap_with_resilience(
        &mut self,
        provider: Box<dyn ChatProvider>,
    ) -> Result<Box<dyn ChatProvider>, GradingError> {
        if !self.resilient_enable.unwrap_or(false) {
            return Ok(provider);
        }

        let mut cfg = ResilienceConfig::default();
        if let Some(attempts) = self.resilient_attempts {
            if attempts == 0 {
                return Err(GradingError::ConfigurationError(
                    "retry attempts must be at least 1".to_string(),
                ));
            }
            cfg.max_attempts = attempts;
        }
        if let Some(base) = self.resilient_base_delay_ms {
            cfg.base_delay_ms = base;
        }
        if let Some(maxd) = self.resilient_max_delay_ms {
            cfg.max_delay_ms = maxd;
        }
        if let Some(jitter) = self.resilient_jitter {
            cfg.jitter = jitter;
        }
        Ok(Box::new(ResilientLLM::new(provider, cfg)))
    }

    fn log_state(&self) {
        log::debug!(
            "building {:?} client: model={:?} temperature={:?} base_url={:?} resilient={:?}",
            self.backend,
            self.model,
            self.temperature,
            self.base_url,
            self.resilient_enable
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_backend_is_rejected() {
        let err = LLMBuilder::new().api_key("sk-test").build().err().unwrap();
        assert!(matches!(err, GradingError::InvalidRequest(_)));
    }

    #[test]
    fn missing_key_is_auth_error() {
        let err = LLMBuilder::new()
            .backend(LLMBackend::OpenAI)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, GradingError::AuthError(_)));
    }

    #[test]
    fn compatible_backend_needs_base_url() {
        let err = LLMBuilder::new()
            .backend(LLMBackend::OpenAICompatible)
            .api_key("sk-test")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, GradingError::ConfigurationError(_)));
    }

    #[test]
    fn builds_evaluator_with_requested_samples() {
        let evaluator = LLMBuilder::new()
            .backend(LLMBackend::OpenAICompatible)
            .base_url("http://localhost:11434/v1")
            .api_key("ollama")
            .model("llama3.1")
            .samples(5)
            .resilient(true)
            .build_evaluator()
            .unwrap();
        assert_eq!(evaluator.samples(), 5);
    }

    #[test]
    fn zero_retry_attempts_is_rejected() {
        let err = LLMBuilder::new()
            .backend(LLMBackend::OpenAI)
            .api_key("sk-test")
            .resilient(true)
            .resilient_attempts(0)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, GradingError::ConfigurationError(_)));
    }

    #[test]
    fn zero_samples_is_rejected() {
        let err = LLMBuilder::new()
            .backend(LLMBackend::OpenAI)
            .api_key("sk-test")
            .samples(0)
            .build_evaluator()
            .err()
            .unwrap();
        assert!(matches!(err, GradingError::InvalidRequest(_)));
    }
}
