use thiserror::Error;

/// Error types that can occur while grading a submission.
#[derive(Debug, Error)]
pub enum GradingError {
    /// HTTP transport errors (connect, timeout, broken body)
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Authentication and authorization errors
    #[error("Auth error: {0}")]
    AuthError(String),
    /// Invalid request parameters, such as an empty learner summary
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Errors returned by the model provider
    #[error("Provider error: {0}")]
    ProviderError(String),
    /// Model output could not be read as an evaluation record
    #[error("Parse error: {message}. Raw response: {raw_response}")]
    ParseError {
        message: String,
        raw_response: String,
    },
    /// Caller asked for something the grader does not know, e.g. an unknown criterion
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// No consensus could be formed from the requested samples
    #[error("Consensus failure: {0}")]
    ConsensusFailure(String),
    /// Retry attempts exceeded
    #[error("Retry attempts exceeded after {attempts} tries: {last_error}")]
    RetryExceeded { attempts: usize, last_error: String },
}

impl GradingError {
    /// Builds a [`GradingError::ParseError`] keeping the offending model output.
    pub fn parse(message: impl Into<String>, raw_response: impl Into<String>) -> Self {
        GradingError::ParseError {
            message: message.into(),
            raw_response: raw_response.into(),
        }
    }

    /// Whether this error came from talking to the model service rather than
    /// from reading its answer.
    pub fn is_invocation(&self) -> bool {
        matches!(
            self,
            GradingError::HttpError(_)
                | GradingError::AuthError(_)
                | GradingError::ProviderError(_)
                | GradingError::RetryExceeded { .. }
        )
    }
}

/// Converts reqwest HTTP errors into GradingErrors
impl From<reqwest::Error> for GradingError {
    fn from(err: reqwest::Error) -> Self {
        GradingError::HttpError(err.to_string())
    }
}
