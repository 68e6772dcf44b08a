use miette::Diagnostic;
use thiserror::Error;

/// Driver error type
#[derive(Error, Debug, Diagnostic)]
pub enum DriverError {
    /// A session is already being driven by this connector
    #[error("A driver session is already active for this connector")]
    #[diagnostic(
        code(driver::session_already_active),
        help("At most one session may drive a framework identity at a time; stop the existing session first")
    )]
    SessionAlreadyActive,

    /// The master endpoint could not be reached
    #[error("Failed to connect to master '{endpoint}': {reason}")]
    #[diagnostic(
        code(driver::connection_failed),
        help("Check the master address and network reachability")
    )]
    ConnectionFailed { endpoint: String, reason: String },
}

/// Result type for driver operations
pub type DriverResult<T> = std::result::Result<T, DriverError>;

impl DriverError {
    /// Create a SessionAlreadyActive error
    pub fn session_already_active() -> Self {
        Self::SessionAlreadyActive
    }

    /// Create a ConnectionFailed error
    pub fn connection_failed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}
