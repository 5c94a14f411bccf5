//! Process-level plumbing for the company server: layered configuration,
//! logging bootstrap, home directory resolution and shutdown signals.

pub mod config;
pub mod logging;
pub mod paths;
pub mod shutdown;

pub use config::{
    default_logging_config, AppConfig, CliArgs, DatabaseConfig, LoggingConfig, Section,
    ServerConfig,
};
pub use logging::init_logging_from_config;
pub use shutdown::{shutdown_signal, wait_for_shutdown};
