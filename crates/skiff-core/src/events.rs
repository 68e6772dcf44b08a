use crate::resources::Offer;
use crate::task::TaskStatus;
use crate::types::{AgentId, ExecutorId, FrameworkId, MasterInfo, OfferId};
use bytes::Bytes;

/// An inbound notification from the master, delivered to the scheduler one
/// at a time in session order.
///
/// Only `StatusUpdate` carries a redelivery guarantee; every other variant
/// is at-most-once or best-effort.
#[derive(Debug, Clone)]
pub enum SchedulerEvent {
    /// Session established; the master assigned the framework an id.
    /// Fires at most once per session lifetime.
    Registered {
        framework_id: FrameworkId,
        master: MasterInfo,
    },
    /// Session re-established with a newly elected master after a prior
    /// registration
    Reregistered { master: MasterInfo },
    /// Transport lost contact with the master; in-flight offers are
    /// implicitly invalid
    Disconnected,
    /// One or more resource offers granted, each from a single agent
    Offers { offers: Vec<Offer> },
    /// A previously delivered offer is no longer valid
    OfferRescinded { offer_id: OfferId },
    /// A task changed state; see the acknowledgement contract on
    /// [`TaskStatus`]
    StatusUpdate { status: TaskStatus },
    /// Out-of-band executor message, best-effort delivery
    FrameworkMessage {
        executor_id: ExecutorId,
        agent_id: AgentId,
        data: Bytes,
    },
    /// An agent became unreachable; tasks placed on it should be presumed
    /// lost
    AgentLost { agent_id: AgentId },
    /// An executor terminated; unreliable — task-level Lost updates are
    /// the dependable signal
    ExecutorLost {
        executor_id: ExecutorId,
        agent_id: AgentId,
        status: i32,
    },
    /// Unrecoverable framework or driver error; the driver is already
    /// aborted when this is delivered
    Error { message: String },
}
