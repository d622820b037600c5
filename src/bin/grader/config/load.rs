use std::fs;
use std::path::Path;

use rubric_grader::batch::Assignment;

use super::error::ConfigError;
use super::types::AppConfig;

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AppConfig = toml::from_str(&content)?;
    if config.assignments.is_empty() {
        return Err(ConfigError::Invalid(
            "at least one [[assignments]] entry is required".to_string(),
        ));
    }
    Ok(config)
}

/// Reads each assignment's learning material from disk.
pub fn resolve_assignments(
    config: &AppConfig,
    base_dir: &Path,
) -> Result<Vec<Assignment>, ConfigError> {
    config
        .assignments
        .iter()
        .map(|entry| {
            let path = base_dir.join(&entry.material_path);
            let learning_material =
                fs::read_to_string(&path).map_err(|source| ConfigError::Io { path, source })?;
            Ok(Assignment {
                id: entry.id.clone(),
                learning_material,
                expert_summary: entry.expert_summary.clone(),
                key_concepts: entry.key_concepts.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    const CONFIG: &str = r#"
[model]
model = "gpt-4.1-mini"
temperature = 0.2

[grading]
samples = 5
criteria = ["content_coverage", "Content Quality"]

[retry]
max_attempts = 4

[[assignments]]
id = "ch1"
material_path = "ch1.txt"
expert_summary = "Evaluation models differ in purpose."
key_concepts = ["CIPP", "formative evaluation"]
"#;

    #[test]
    fn parses_sections_and_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "grader.toml", CONFIG);
        let config = load_config(&path).unwrap();

        assert_eq!(config.model.backend, "openai");
        assert_eq!(config.model.model.as_deref(), Some("gpt-4.1-mini"));
        assert_eq!(config.grading.samples, 5);
        assert!(config.grading.parallel);
        assert_eq!(config.grading.criteria.len(), 2);
        let retry = config.retry.unwrap();
        assert_eq!(retry.max_attempts, 4);
        assert_eq!(retry.base_delay_ms, 200);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.assignments[0].key_concepts.len(), 2);
    }

    #[test]
    fn retry_is_off_without_section() {
        let dir = TempDir::new().unwrap();
        let body = CONFIG.replace("[retry]\nmax_attempts = 4\n", "");
        let path = write(&dir, "grader.toml", &body);
        assert!(load_config(&path).unwrap().retry.is_none());
    }

    #[test]
    fn material_is_read_relative_to_base_dir() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "grader.toml", CONFIG);
        write(&dir, "ch1.txt", "Chapter one text.");
        let config = load_config(&path).unwrap();

        let assignments = resolve_assignments(&config, dir.path()).unwrap();
        assert_eq!(assignments[0].id, "ch1");
        assert_eq!(assignments[0].learning_material, "Chapter one text.");
    }

    #[test]
    fn missing_material_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "grader.toml", CONFIG);
        let config = load_config(&path).unwrap();

        let err = resolve_assignments(&config, dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { ref path, .. } if path.ends_with("ch1.txt")));
    }

    #[test]
    fn config_without_assignments_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "grader.toml", "[grading]\nsamples = 3\n");
        assert!(matches!(load_config(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "grader.toml", "[grading\nsamples = ");
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }
}
