//! Skiff Scheduler - Event-handler contract and run-loop lifecycle
//!
//! This crate provides:
//! - The `Scheduler` trait: one overridable reaction per master event,
//!   each with a safe default (offers are declined, everything else is a
//!   no-op)
//! - Event dispatch from the driver session to the handler set
//! - The `Lifecycle` run-loop: start the driver, dispatch until a
//!   terminal state, stop the driver on every exit path

pub mod error;
pub mod lifecycle;
pub mod scheduler;

// Re-export commonly used types
pub use error::{Result, SchedulerError};
pub use lifecycle::Lifecycle;
pub use scheduler::{dispatch, DefaultScheduler, Scheduler};
