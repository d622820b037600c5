use secrecy::SecretString;

/// Default model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4.1";
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
/// Default endpoint of the OpenAI-compatible API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";

/// Connection and sampling settings for one model client.
///
/// Each client owns its own copy, so several configurations (say, two
/// temperatures) can run side by side in the same process.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// API key for authentication.
    pub credential: SecretString,
    /// Base URL of the API, e.g. `https://api.openai.com/v1/`.
    pub base_url: String,
    /// Maximum tokens to generate in responses.
    pub max_tokens: Option<u32>,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
    /// Ask the service to constrain output to a JSON object.
    pub json_mode: bool,
}

impl ModelConfig {
    /// Creates a configuration with default model, temperature and endpoint.
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            credential: SecretString::new(credential.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: None,
            timeout_seconds: None,
            json_mode: true,
        }
    }
}
