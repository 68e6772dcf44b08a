use skiff_core::{OfferId, TaskId, TaskSpec};
use std::time::Duration;
use uuid::Uuid;

/// How task-status updates are acknowledged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AckPolicy {
    /// Returning from the status-update handler acknowledges the update
    #[default]
    Implicit,
    /// The framework must call `acknowledge` on the driver; unacknowledged
    /// updates are redelivered every retry interval
    Explicit,
}

/// Configuration for a driver session
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Acknowledgement mode for task-status updates
    pub ack_policy: AckPolicy,
    /// Interval between redeliveries of unacknowledged status updates
    pub status_retry_interval: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            ack_policy: AckPolicy::Implicit,
            status_retry_interval: Duration::from_secs(5),
        }
    }
}

/// A command issued by the framework, as observed by the master side.
///
/// The driver's own `stop` is lifecycle plumbing, not a framework command,
/// and is not recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Decline(OfferId),
    Launch {
        offer_id: OfferId,
        tasks: Vec<TaskSpec>,
    },
    Acknowledge {
        task_id: TaskId,
        ack_token: Uuid,
    },
    ReviveOffers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_config_defaults() {
        let config = DriverConfig::default();
        assert_eq!(config.ack_policy, AckPolicy::Implicit);
        assert_eq!(config.status_retry_interval, Duration::from_secs(5));
    }
}
