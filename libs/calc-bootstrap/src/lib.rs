//! Bootstrap library for the calculator server process
//!
//! - [`config`]: layered application configuration and typed module sections
//! - [`logging`]: `tracing` subscriber setup
//! - [`signals`]: OS termination signal waiters

pub mod config;
pub mod logging;
pub mod signals;

pub use config::{
    AppConfig, CliArgs, ConfigError, ConfigProvider, ENV_PREFIX, module_config_or_default,
};
pub use logging::{LogFormat, LoggingConfig, init_logging};
pub use signals::{ShutdownSignal, cancel_on_shutdown, wait_for_shutdown};
