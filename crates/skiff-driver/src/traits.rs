use crate::error::DriverResult;
use async_trait::async_trait;
use skiff_core::{
    FrameworkInfo, MasterEndpoint, OfferId, SchedulerEvent, TaskSpec, TaskStatus, TerminalState,
};
use std::sync::Arc;

/// Commands a framework issues against the master session.
///
/// All commands are fire-and-forget: returning does not mean the master
/// accepted the command, only that it was handed to the transport.
/// Outcomes are observed through subsequent events — a launch against an
/// invalid offer, for example, surfaces as `Lost` task statuses. Commands
/// are safe to call synchronously from inside event handlers.
pub trait SchedulerDriver: Send + Sync {
    /// Release an offer back to the allocator
    fn decline(&self, offer_id: &OfferId);

    /// Consume an offer by launching tasks against it
    fn launch(&self, offer_id: &OfferId, tasks: Vec<TaskSpec>);

    /// Acknowledge a status update delivered under explicit acknowledgement
    fn acknowledge(&self, status: &TaskStatus);

    /// Ask the allocator to resume sending offers suppressed by declines
    fn revive_offers(&self);

    /// Request session termination. Idempotent: safe to call on a session
    /// that has already stopped or aborted.
    fn stop(&self);
}

/// What a session yields from [`DriverSession::next_event`]
#[derive(Debug)]
pub enum SessionEvent {
    /// An inbound master event to dispatch
    Event(SchedulerEvent),
    /// The session reached a terminal state; no further events follow
    Terminated(TerminalState),
}

/// An open session with the master.
///
/// Event delivery is serialized: `next_event` yields one event at a time,
/// and the caller dispatches it before polling again, so no two handlers
/// ever run concurrently. A slow handler delays everything behind it,
/// including time-sensitive events like offer rescissions.
#[async_trait]
pub trait DriverSession: Send + std::fmt::Debug {
    /// Command handle for issuing framework commands from event handlers
    fn commands(&self) -> Arc<dyn SchedulerDriver>;

    /// Await the next inbound event or the terminal state
    async fn next_event(&mut self) -> SessionEvent;

    /// Request session termination; idempotent
    fn stop(&self);
}

/// Opens sessions against a master.
///
/// A connector hands out at most one session at a time: concurrent drivers
/// for the same framework are a protocol violation the master would treat
/// as a failover.
#[async_trait]
pub trait DriverConnector: Send + Sync {
    /// Open a session for the given framework identity.
    ///
    /// An unreachable or invalid endpoint does not fail here; it surfaces
    /// as an `Error` event from the returned session.
    async fn start(
        &self,
        framework: &FrameworkInfo,
        master: &MasterEndpoint,
    ) -> DriverResult<Box<dyn DriverSession>>;
}
