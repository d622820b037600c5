mod error;
mod load;
mod types;

pub use load::{load_config, resolve_assignments};
pub use types::{AppConfig, LoggingConfig};
