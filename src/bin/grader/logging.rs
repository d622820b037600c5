use flexi_logger::{FileSpec, Logger, LoggerHandle};

use crate::config::LoggingConfig;

/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(&config.level)?;
    let logger = match &config.path {
        Some(path) => {
            let mut spec = FileSpec::default().suppress_timestamp();
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                spec = spec.directory(dir);
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                spec = spec.basename(stem);
            }
            logger.log_to_file(spec)
        }
        None => logger.log_to_stderr(),
    };
    Ok(logger.start()?)
}
