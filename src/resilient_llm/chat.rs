use async_trait::async_trait;

use crate::{
    chat::{ChatMessage, ChatProvider, ChatResponse},
    error::GradingError,
};

use super::wrapper::ResilientLLM;

#[async_trait]
impl ChatProvider for ResilientLLM {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<Box<dyn ChatResponse>, GradingError> {
        self.retry(|| self.inner.chat(messages)).await
    }
}
