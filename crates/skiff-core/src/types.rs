use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Define an opaque string identifier newtype.
///
/// Identifiers are tokens minted by the master (or by the framework for
/// task ids); the shim never inspects their contents.
macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// The raw token
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

opaque_id!(
    /// Framework identifier assigned by the master at registration
    FrameworkId
);
opaque_id!(
    /// Identifier of a single resource offer
    OfferId
);
opaque_id!(
    /// Identifier of an agent node contributing resources
    AgentId
);
opaque_id!(
    /// Identifier of an executor process on an agent
    ExecutorId
);
opaque_id!(
    /// Framework-chosen task identifier
    TaskId
);

/// Identity a framework registers with the master.
///
/// Immutable once the run-loop starts; constructed once at process start
/// and owned by the lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkInfo {
    /// Human-readable framework name
    pub name: String,
    /// Principal the framework runs as; empty means the current user
    #[serde(default)]
    pub user: String,
    /// Allocation role, if the cluster partitions resources by role
    #[serde(default)]
    pub role: Option<String>,
    /// Whether the master should checkpoint framework state on agents
    #[serde(default)]
    pub checkpoint: bool,
    /// URL of the framework's web UI, advertised by the master
    #[serde(default)]
    pub webui_url: Option<String>,
    /// Seconds the master keeps the framework's tasks alive after a
    /// disconnect before declaring the framework gone
    #[serde(default)]
    pub failover_timeout: Option<f64>,
    /// Previously assigned id, set when re-registering after a failover
    #[serde(default)]
    pub id: Option<FrameworkId>,
}

impl FrameworkInfo {
    /// Create a framework identity with default optional fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user: String::new(),
            role: None,
            checkpoint: false,
            webui_url: None,
            failover_timeout: None,
            id: None,
        }
    }

    /// Set the principal the framework runs as
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Set the allocation role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the failover timeout in seconds
    pub fn with_failover_timeout(mut self, seconds: f64) -> Self {
        self.failover_timeout = Some(seconds);
        self
    }

    /// Validate the identity before it is handed to a driver
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid_framework("framework name is empty"));
        }
        if let Some(timeout) = self.failover_timeout {
            if !timeout.is_finite() || timeout < 0.0 {
                return Err(CoreError::invalid_framework(format!(
                    "failover timeout must be a non-negative number of seconds, got {}",
                    timeout
                )));
            }
        }
        Ok(())
    }
}

/// Locator used to open a session with the master.
///
/// Either a direct `host:port` address or a `zk://host:port/path` quorum
/// discovery locator. Immutable for the process lifetime; reconnection is
/// the driver's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasterEndpoint(String);

impl MasterEndpoint {
    /// Parse and validate an endpoint string
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CoreError::invalid_endpoint(value, "endpoint is empty"));
        }

        if let Some(rest) = value.strip_prefix("zk://") {
            let (authority, path) = match rest.split_once('/') {
                Some(parts) => parts,
                None => {
                    return Err(CoreError::invalid_endpoint(
                        value,
                        "quorum locator is missing a path",
                    ))
                }
            };
            if authority.is_empty() {
                return Err(CoreError::invalid_endpoint(
                    value,
                    "quorum locator has no host",
                ));
            }
            if path.is_empty() {
                return Err(CoreError::invalid_endpoint(
                    value,
                    "quorum locator path is empty",
                ));
            }
            return Ok(Self(value.to_string()));
        }

        let (host, port) = match value.rsplit_once(':') {
            Some(parts) => parts,
            None => {
                return Err(CoreError::invalid_endpoint(
                    value,
                    "address is missing a port",
                ))
            }
        };
        if host.is_empty() {
            return Err(CoreError::invalid_endpoint(value, "address has no host"));
        }
        match port.parse::<u16>() {
            Ok(p) if p > 0 => Ok(Self(value.to_string())),
            _ => Err(CoreError::invalid_endpoint(
                value,
                format!("'{}' is not a valid port", port),
            )),
        }
    }

    /// The raw locator string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this endpoint is discovered through a quorum locator
    pub fn is_quorum_locator(&self) -> bool {
        self.0.starts_with("zk://")
    }
}

impl fmt::Display for MasterEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MasterEndpoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Information about the currently elected master, delivered with
/// registration events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterInfo {
    /// Master identifier, changes across elections
    pub id: String,
    /// Address the session is connected to
    pub address: String,
}

impl MasterInfo {
    /// Create master info
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
        }
    }
}

/// Outcome of a driver run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    /// Normal termination: explicit stop or graceful master-directed shutdown
    Stopped,
    /// Unrecoverable failure; the driver is aborted
    Aborted,
}

impl TerminalState {
    /// Process exit code this terminal state maps to
    pub fn exit_code(self) -> i32 {
        match self {
            TerminalState::Stopped => 0,
            TerminalState::Aborted => 1,
        }
    }

    /// Whether this is a normal termination
    pub fn is_stopped(self) -> bool {
        matches!(self, TerminalState::Stopped)
    }
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalState::Stopped => write!(f, "stopped"),
            TerminalState::Aborted => write!(f, "aborted"),
        }
    }
}
