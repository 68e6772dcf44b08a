use async_trait::async_trait;
use bytes::Bytes;
use skiff_core::{
    AgentId, ExecutorId, FrameworkId, MasterInfo, Offer, OfferId, SchedulerEvent, TaskStatus,
};
use skiff_driver::SchedulerDriver;
use tracing::info;

/// Framework-defined reactions to master events.
///
/// Every method has a default implementation, so a framework overrides
/// only the reactions it needs. Defaults are no-ops except
/// [`resource_offers`](Scheduler::resource_offers), which declines every
/// offer. Events are delivered one at a time in session order; handlers
/// never run concurrently and may issue driver commands synchronously.
/// A handler that blocks delays every event behind it, including
/// time-sensitive ones like rescissions — hand long work off to a worker.
/// Handler panics are not caught: they are fatal to the run-loop.
#[allow(unused_variables)]
#[async_trait]
pub trait Scheduler: Send {
    /// The session is established and the master assigned the framework
    /// an identifier. Fires at most once per session lifetime; a master
    /// failover later produces `reregistered`, never a second
    /// `registered`.
    async fn registered(
        &mut self,
        driver: &dyn SchedulerDriver,
        framework_id: &FrameworkId,
        master: &MasterInfo,
    ) {
    }

    /// The session was re-established with a newly elected master.
    /// Must be safe to call after state was already initialized by
    /// `registered`, without duplicating side effects.
    async fn reregistered(&mut self, driver: &dyn SchedulerDriver, master: &MasterInfo) {}

    /// The transport lost contact with the master. Every in-flight offer
    /// is implicitly invalid, and driver commands are best-effort until
    /// the connection recovers.
    async fn disconnected(&mut self, driver: &dyn SchedulerDriver) {}

    /// Resources were offered to this framework. Each offer holds
    /// resources from a single agent and may be concurrently offered to
    /// other frameworks; the first framework to launch wins, and losers
    /// see `Lost` statuses on conflicting launches. Declining or ignoring
    /// an offer releases it back to the allocator.
    async fn resource_offers(&mut self, driver: &dyn SchedulerDriver, offers: Vec<Offer>) {
        for offer in offers {
            info!(offer_id = %offer.id, agent_id = %offer.agent_id, "offer declined");
            driver.decline(&offer.id);
        }
    }

    /// A previously delivered offer is no longer valid. The offer must
    /// not be acted on again; a launch that raced the rescission is
    /// tolerated by the master and surfaces as `Lost` statuses.
    async fn offer_rescinded(&mut self, driver: &dyn SchedulerDriver, offer_id: &OfferId) {}

    /// A task changed state. Under implicit acknowledgement, returning
    /// from this handler acknowledges the update, so the handler must be
    /// effectively idempotent — the update is redelivered if the process
    /// dies mid-handler. Under explicit acknowledgement the handler must
    /// call [`SchedulerDriver::acknowledge`] or the master redelivers the
    /// identical update indefinitely.
    async fn status_update(&mut self, driver: &dyn SchedulerDriver, status: TaskStatus) {}

    /// An executor sent an out-of-band message. Best-effort delivery;
    /// never rely on it for required coordination.
    async fn framework_message(
        &mut self,
        driver: &dyn SchedulerDriver,
        executor_id: &ExecutorId,
        agent_id: &AgentId,
        data: Bytes,
    ) {
    }

    /// An agent became unreachable. Tasks placed on it should be presumed
    /// lost and rescheduled; per-task `Lost` updates arrive separately
    /// for tasks that were running.
    async fn agent_lost(&mut self, driver: &dyn SchedulerDriver, agent_id: &AgentId) {}

    /// An executor terminated. Delivery is unreliable — task-level status
    /// updates are the dependable termination signal.
    async fn executor_lost(
        &mut self,
        driver: &dyn SchedulerDriver,
        executor_id: &ExecutorId,
        agent_id: &AgentId,
        status: i32,
    ) {
    }

    /// An unrecoverable framework or driver error occurred. The driver is
    /// already aborted when this fires; no further commands can be
    /// issued.
    async fn error(&mut self, driver: &dyn SchedulerDriver, message: &str) {}
}

/// A scheduler with every reaction left at its default
pub struct DefaultScheduler;

#[async_trait]
impl Scheduler for DefaultScheduler {}

/// Route one inbound event to the matching handler
pub async fn dispatch(
    scheduler: &mut dyn Scheduler,
    driver: &dyn SchedulerDriver,
    event: SchedulerEvent,
) {
    match event {
        SchedulerEvent::Registered {
            framework_id,
            master,
        } => scheduler.registered(driver, &framework_id, &master).await,
        SchedulerEvent::Reregistered { master } => scheduler.reregistered(driver, &master).await,
        SchedulerEvent::Disconnected => scheduler.disconnected(driver).await,
        SchedulerEvent::Offers { offers } => scheduler.resource_offers(driver, offers).await,
        SchedulerEvent::OfferRescinded { offer_id } => {
            scheduler.offer_rescinded(driver, &offer_id).await
        }
        SchedulerEvent::StatusUpdate { status } => scheduler.status_update(driver, status).await,
        SchedulerEvent::FrameworkMessage {
            executor_id,
            agent_id,
            data,
        } => {
            scheduler
                .framework_message(driver, &executor_id, &agent_id, data)
                .await
        }
        SchedulerEvent::AgentLost { agent_id } => scheduler.agent_lost(driver, &agent_id).await,
        SchedulerEvent::ExecutorLost {
            executor_id,
            agent_id,
            status,
        } => {
            scheduler
                .executor_lost(driver, &executor_id, &agent_id, status)
                .await
        }
        SchedulerEvent::Error { message } => scheduler.error(driver, &message).await,
    }
}
