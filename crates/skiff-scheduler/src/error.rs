use miette::Diagnostic;
use thiserror::Error;

/// Scheduler error type
#[derive(Error, Debug, Diagnostic)]
pub enum SchedulerError {
    /// Invalid identity or endpoint configuration
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(scheduler::config_error),
        help("Check the framework identity and master endpoint")
    )]
    Config(#[from] skiff_core::CoreError),

    /// Driver error
    #[error("Driver error: {0}")]
    #[diagnostic(
        code(scheduler::driver_error),
        help("Check the driver session; only one session may be active per connector")
    )]
    Driver(#[from] skiff_driver::DriverError),
}

/// Result type for scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;
