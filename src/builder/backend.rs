use crate::error::GradingError;

/// Supported model backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LLMBackend {
    /// api.openai.com
    OpenAI,
    /// Any server speaking the OpenAI chat completions protocol; needs a base URL.
    OpenAICompatible,
}

impl std::str::FromStr for LLMBackend {
    type Err = GradingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMBackend::OpenAI),
            "openai-compatible" | "openai_compatible" | "compatible" => {
                Ok(LLMBackend::OpenAICompatible)
            }
            _ => Err(GradingError::ConfigurationError(format!(
                "Unknown LLM backend: {s}"
            ))),
        }
    }
}
