use miette::Diagnostic;
use thiserror::Error;

/// Core error type for Skiff operations
#[derive(Error, Debug, Diagnostic)]
pub enum CoreError {
    /// Invalid master endpoint
    #[error("Invalid master endpoint '{endpoint}': {reason}")]
    #[diagnostic(
        code(skiff::invalid_endpoint),
        help("Use a direct address like 'host:5050' or a quorum locator like 'zk://host:2181/path'")
    )]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Invalid framework identity
    #[error("Invalid framework identity: {reason}")]
    #[diagnostic(
        code(skiff::invalid_framework),
        help("Check the framework name and optional fields before starting the driver")
    )]
    InvalidFramework { reason: String },
}

/// Result type alias for Skiff core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create an InvalidEndpoint error
    pub fn invalid_endpoint(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidFramework error
    pub fn invalid_framework(reason: impl Into<String>) -> Self {
        Self::InvalidFramework {
            reason: reason.into(),
        }
    }
}
