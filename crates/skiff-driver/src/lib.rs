//! Skiff Driver - The adapter boundary between a scheduler and the master
//!
//! This crate provides:
//! - The command surface a framework issues against a session
//! - The session contract: serialized event delivery and idempotent stop
//! - Driver configuration (acknowledgement policy, retry interval)
//! - An in-process mock driver that simulates master behavior for tests
//!   and development

pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{DriverError, DriverResult};
pub use mock::{MasterHandle, MockDriver};
pub use traits::{DriverConnector, DriverSession, SchedulerDriver, SessionEvent};
pub use types::{AckPolicy, Command, DriverConfig};
