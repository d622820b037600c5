//! Model invocation clients.

mod config;
pub mod openai;

pub use config::{ModelConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
