//! Skiff Core - Fundamental types for the Skiff framework scheduler shim
//!
//! This crate provides:
//! - Opaque identifiers for frameworks, offers, agents, executors, and tasks
//! - Framework identity and master endpoint types
//! - Resource offers and task status types
//! - The inbound scheduler event enum
//! - Error types with miette diagnostics

pub mod error;
pub mod events;
pub mod resources;
pub mod task;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use events::SchedulerEvent;
pub use resources::{Offer, Resource, ResourceValue, ValueRange};
pub use task::{TaskSpec, TaskState, TaskStatus};
pub use types::{
    AgentId, ExecutorId, FrameworkId, FrameworkInfo, MasterEndpoint, MasterInfo, OfferId, TaskId,
    TerminalState,
};
