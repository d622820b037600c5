use async_trait::async_trait;

use crate::{
    chat::{ChatMessage, ChatProvider},
    error::GradingError,
    evaluation::{parse_evaluation, EvaluationRecord},
};

/// One call to the model producing exactly one evaluation record.
///
/// Implementations fail with [`GradingError::ParseError`] when the output is
/// not a valid record for `criterion`, and with an invocation-class error
/// (see [`GradingError::is_invocation`]) when the service cannot be reached.
#[async_trait]
pub trait SingleShot: Send + Sync {
    async fn invoke(
        &self,
        instruction: &str,
        criterion: &str,
    ) -> Result<EvaluationRecord, GradingError>;
}

/// [`SingleShot`] over any chat provider: the instruction is sent as a single
/// user message and the reply goes through the strict record parser.
pub struct ChatEvaluator {
    provider: Box<dyn ChatProvider>,
    system: Option<String>,
}

impl ChatEvaluator {
    pub fn new(provider: Box<dyn ChatProvider>) -> Self {
        Self {
            provider,
            system: None,
        }
    }

    /// Prepends a system message to every request.
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

#[async_trait]
impl SingleShot for ChatEvaluator {
    async fn invoke(
        &self,
        instruction: &str,
        criterion: &str,
    ) -> Result<EvaluationRecord, GradingError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system {
            messages.push(ChatMessage::system().content(system.as_str()).build());
        }
        messages.push(ChatMessage::user().content(instruction).build());

        let response = self.provider.chat(&messages).await?;
        let text = response
            .text()
            .ok_or_else(|| GradingError::parse("model returned no text", response.to_string()))?;
        parse_evaluation(&text, criterion)
    }
}
