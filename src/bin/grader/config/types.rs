use std::path::PathBuf;

use rubric_grader::resilient_llm::ResilienceConfig;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelSection,
    pub grading: GradingSection,
    /// Transport retries are enabled when this section is present.
    pub retry: Option<ResilienceConfig>,
    pub logging: LoggingConfig,
    pub assignments: Vec<AssignmentConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    pub backend: String,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    /// Falls back to `OPENAI_API_KEY` when unset.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_tokens: Option<u32>,
    pub system: Option<String>,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            backend: "openai".to_string(),
            model: None,
            temperature: None,
            api_key: None,
            base_url: None,
            timeout_seconds: None,
            max_tokens: None,
            system: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GradingSection {
    pub samples: usize,
    pub parallel: bool,
    /// Criterion names or keys; empty means all of them.
    pub criteria: Vec<String>,
    pub fail_fast: bool,
}

impl Default for GradingSection {
    fn default() -> Self {
        Self {
            samples: rubric_grader::evaluator::DEFAULT_SAMPLE_COUNT,
            parallel: true,
            criteria: Vec::new(),
            fail_fast: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Log file; stderr when unset.
    pub path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignmentConfig {
    pub id: String,
    /// Full learning material; relative paths resolve against the config file.
    pub material_path: PathBuf,
    pub expert_summary: String,
    #[serde(default)]
    pub key_concepts: Vec<String>,
}
