use crate::error::{DriverError, DriverResult};
use crate::traits::{DriverConnector, DriverSession, SchedulerDriver, SessionEvent};
use crate::types::{AckPolicy, Command, DriverConfig};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use skiff_core::{
    AgentId, ExecutorId, FrameworkId, FrameworkInfo, MasterEndpoint, MasterInfo, Offer, OfferId,
    Resource, SchedulerEvent, TaskSpec, TaskState, TaskStatus, TerminalState,
};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Master-side stimuli scripted through [`MasterHandle`]
#[derive(Debug)]
enum MasterEvent {
    Register,
    Offers(Vec<Offer>),
    Rescind(OfferId),
    Update(TaskStatus),
    Message {
        executor_id: ExecutorId,
        agent_id: AgentId,
        data: Bytes,
    },
    Disconnect,
    AgentLost(AgentId),
    ExecutorLost {
        executor_id: ExecutorId,
        agent_id: AgentId,
        status: i32,
    },
    Fail(String),
    Shutdown,
}

/// Master-side bookkeeping shared by the handle, the command sink, and the
/// session
#[derive(Default)]
struct MasterState {
    /// Offers granted and not yet consumed, declined, or rescinded
    outstanding_offers: HashSet<OfferId>,
    /// Delivered but unacknowledged status updates, in delivery order
    pending_acks: Vec<(Uuid, TaskStatus)>,
    aborted: bool,
}

fn lock(state: &Mutex<MasterState>) -> MutexGuard<'_, MasterState> {
    state.lock().expect("master state lock poisoned")
}

/// Fire-and-forget command surface handed to event handlers.
///
/// Commands issued after the session aborted are dropped; the driver is
/// gone and there is nothing to deliver them to.
struct MockCommandSink {
    state: Arc<Mutex<MasterState>>,
    event_tx: mpsc::UnboundedSender<MasterEvent>,
    command_tx: mpsc::UnboundedSender<Command>,
    token: CancellationToken,
    ack_policy: AckPolicy,
}

impl MockCommandSink {
    fn record(&self, command: Command) {
        let _ = self.command_tx.send(command);
    }

    fn aborted(&self) -> bool {
        let aborted = lock(&self.state).aborted;
        if aborted {
            warn!("command issued after driver abort, dropped");
        }
        aborted
    }
}

impl SchedulerDriver for MockCommandSink {
    fn decline(&self, offer_id: &OfferId) {
        if self.aborted() {
            return;
        }
        let known = lock(&self.state).outstanding_offers.remove(offer_id);
        if !known {
            debug!(offer_id = %offer_id, "decline of unknown offer ignored by master");
        }
        self.record(Command::Decline(offer_id.clone()));
    }

    fn launch(&self, offer_id: &OfferId, tasks: Vec<TaskSpec>) {
        if self.aborted() {
            return;
        }
        let valid = lock(&self.state).outstanding_offers.remove(offer_id);
        if !valid {
            // Master-side guard: the framework raced a rescission or reused
            // a consumed offer; the tasks are lost, not the session.
            warn!(
                offer_id = %offer_id,
                tasks = tasks.len(),
                "launch against invalid offer, tasks lost"
            );
            for task in &tasks {
                let mut status = TaskStatus::new(task.task_id.clone(), TaskState::Lost)
                    .with_message("task launched with an invalid offer");
                status.timestamp = Some(Utc::now());
                if self.ack_policy == AckPolicy::Explicit {
                    status.ack_token = Some(Uuid::new_v4());
                }
                let _ = self.event_tx.send(MasterEvent::Update(status));
            }
        }
        self.record(Command::Launch {
            offer_id: offer_id.clone(),
            tasks,
        });
    }

    fn acknowledge(&self, status: &TaskStatus) {
        if self.aborted() {
            return;
        }
        let Some(ack_token) = status.ack_token else {
            debug!(task_id = %status.task_id, "acknowledge without an ack token ignored");
            return;
        };
        lock(&self.state)
            .pending_acks
            .retain(|(token, _)| *token != ack_token);
        self.record(Command::Acknowledge {
            task_id: status.task_id.clone(),
            ack_token,
        });
    }

    fn revive_offers(&self) {
        if self.aborted() {
            return;
        }
        self.record(Command::ReviveOffers);
    }

    fn stop(&self) {
        // Cancelling an already-cancelled token is a no-op, which is what
        // makes double-stop safe.
        self.token.cancel();
    }
}

/// Driver session backed by the in-process mock master
impl std::fmt::Debug for MockSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSession")
            .field("master_address", &self.master_address)
            .field("registered", &self.registered)
            .field("rx_closed", &self.rx_closed)
            .finish_non_exhaustive()
    }
}

pub struct MockSession {
    config: DriverConfig,
    state: Arc<Mutex<MasterState>>,
    event_rx: mpsc::UnboundedReceiver<MasterEvent>,
    sink: Arc<MockCommandSink>,
    token: CancellationToken,
    master_address: String,
    framework: FrameworkInfo,
    registered: Option<FrameworkId>,
    queued: VecDeque<SchedulerEvent>,
    rx_closed: bool,
}

impl MockSession {
    fn translate(&mut self, event: MasterEvent) -> SessionEvent {
        match event {
            MasterEvent::Register => {
                let master =
                    MasterInfo::new(Uuid::new_v4().to_string(), self.master_address.clone());
                match &self.registered {
                    None => {
                        let framework_id = self
                            .framework
                            .id
                            .clone()
                            .unwrap_or_else(|| FrameworkId::new(Uuid::new_v4().to_string()));
                        self.registered = Some(framework_id.clone());
                        info!(framework_id = %framework_id, "framework registered");
                        SessionEvent::Event(SchedulerEvent::Registered {
                            framework_id,
                            master,
                        })
                    }
                    Some(framework_id) => {
                        info!(framework_id = %framework_id, "framework re-registered");
                        SessionEvent::Event(SchedulerEvent::Reregistered { master })
                    }
                }
            }
            MasterEvent::Offers(offers) => {
                debug!(count = offers.len(), "delivering offers");
                SessionEvent::Event(SchedulerEvent::Offers { offers })
            }
            MasterEvent::Rescind(offer_id) => {
                SessionEvent::Event(SchedulerEvent::OfferRescinded { offer_id })
            }
            MasterEvent::Update(status) => {
                if self.config.ack_policy == AckPolicy::Explicit {
                    if let Some(ack_token) = status.ack_token {
                        let mut state = lock(&self.state);
                        if !state.pending_acks.iter().any(|(t, _)| *t == ack_token) {
                            state.pending_acks.push((ack_token, status.clone()));
                        }
                    }
                }
                SessionEvent::Event(SchedulerEvent::StatusUpdate { status })
            }
            MasterEvent::Message {
                executor_id,
                agent_id,
                data,
            } => SessionEvent::Event(SchedulerEvent::FrameworkMessage {
                executor_id,
                agent_id,
                data,
            }),
            MasterEvent::Disconnect => SessionEvent::Event(SchedulerEvent::Disconnected),
            MasterEvent::AgentLost(agent_id) => {
                SessionEvent::Event(SchedulerEvent::AgentLost { agent_id })
            }
            MasterEvent::ExecutorLost {
                executor_id,
                agent_id,
                status,
            } => SessionEvent::Event(SchedulerEvent::ExecutorLost {
                executor_id,
                agent_id,
                status,
            }),
            MasterEvent::Fail(message) => {
                // The driver aborts before the error reaches the handler;
                // anything still queued will never be delivered.
                let mut state = lock(&self.state);
                state.aborted = true;
                state.pending_acks.clear();
                drop(state);
                self.queued.clear();
                warn!(%message, "driver aborted");
                SessionEvent::Event(SchedulerEvent::Error { message })
            }
            MasterEvent::Shutdown => {
                info!("master directed shutdown");
                SessionEvent::Terminated(TerminalState::Stopped)
            }
        }
    }
}

#[async_trait]
impl DriverSession for MockSession {
    fn commands(&self) -> Arc<dyn SchedulerDriver> {
        self.sink.clone()
    }

    async fn next_event(&mut self) -> SessionEvent {
        loop {
            if let Some(event) = self.queued.pop_front() {
                return SessionEvent::Event(event);
            }
            if lock(&self.state).aborted {
                return SessionEvent::Terminated(TerminalState::Aborted);
            }
            if self.token.is_cancelled() {
                return SessionEvent::Terminated(TerminalState::Stopped);
            }

            let has_pending = self.config.ack_policy == AckPolicy::Explicit
                && !lock(&self.state).pending_acks.is_empty();

            tokio::select! {
                _ = self.token.cancelled() => {
                    return SessionEvent::Terminated(TerminalState::Stopped);
                }
                _ = tokio::time::sleep(self.config.status_retry_interval), if has_pending => {
                    let pending: Vec<TaskStatus> = lock(&self.state)
                        .pending_acks
                        .iter()
                        .map(|(_, status)| status.clone())
                        .collect();
                    debug!(count = pending.len(), "redelivering unacknowledged status updates");
                    self.queued.extend(
                        pending
                            .into_iter()
                            .map(|status| SchedulerEvent::StatusUpdate { status }),
                    );
                }
                event = self.event_rx.recv(), if !self.rx_closed => {
                    match event {
                        Some(event) => return self.translate(event),
                        None => self.rx_closed = true,
                    }
                }
            }
        }
    }

    fn stop(&self) {
        self.token.cancel();
    }
}

struct SessionParts {
    state: Arc<Mutex<MasterState>>,
    event_rx: mpsc::UnboundedReceiver<MasterEvent>,
    event_tx: mpsc::UnboundedSender<MasterEvent>,
    command_tx: mpsc::UnboundedSender<Command>,
}

/// In-process driver for tests and development.
///
/// Pairs with a [`MasterHandle`] that scripts the master's side of the
/// session and observes the commands the framework issues. The mock
/// enforces the master-side guards a real cluster would: launches against
/// rescinded, consumed, or disconnect-invalidated offers produce `Lost`
/// statuses, and unacknowledged updates under explicit acknowledgement are
/// redelivered every retry interval.
pub struct MockDriver {
    config: DriverConfig,
    reachable: bool,
    parts: Mutex<Option<SessionParts>>,
}

impl MockDriver {
    /// Create a mock driver and the handle scripting its master
    pub fn new(config: DriverConfig) -> (Self, MasterHandle) {
        Self::with_reachability(config, true)
    }

    /// Create a mock driver whose master cannot be reached: the session
    /// delivers a connection error and aborts
    pub fn unreachable(config: DriverConfig) -> (Self, MasterHandle) {
        Self::with_reachability(config, false)
    }

    fn with_reachability(config: DriverConfig, reachable: bool) -> (Self, MasterHandle) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(MasterState::default()));

        let handle = MasterHandle {
            state: state.clone(),
            event_tx: event_tx.clone(),
            command_rx,
            ack_policy: config.ack_policy,
        };
        let driver = Self {
            config,
            reachable,
            parts: Mutex::new(Some(SessionParts {
                state,
                event_rx,
                event_tx,
                command_tx,
            })),
        };
        (driver, handle)
    }
}

#[async_trait]
impl DriverConnector for MockDriver {
    async fn start(
        &self,
        framework: &FrameworkInfo,
        master: &MasterEndpoint,
    ) -> DriverResult<Box<dyn DriverSession>> {
        let parts = self
            .parts
            .lock()
            .expect("session parts lock poisoned")
            .take()
            .ok_or_else(DriverError::session_already_active)?;

        let token = CancellationToken::new();
        let sink = Arc::new(MockCommandSink {
            state: parts.state.clone(),
            event_tx: parts.event_tx,
            command_tx: parts.command_tx,
            token: token.clone(),
            ack_policy: self.config.ack_policy,
        });
        let mut session = MockSession {
            config: self.config.clone(),
            state: parts.state,
            event_rx: parts.event_rx,
            sink,
            token,
            master_address: master.to_string(),
            framework: framework.clone(),
            registered: None,
            queued: VecDeque::new(),
            rx_closed: false,
        };

        if self.reachable {
            info!(master = %master, framework = %framework.name, "mock driver session started");
        } else {
            // Connection failures surface as an Error event from the
            // session, never as a start failure.
            let error = DriverError::connection_failed(master.to_string(), "connection refused");
            lock(&session.state).aborted = true;
            session.queued.push_back(SchedulerEvent::Error {
                message: error.to_string(),
            });
            warn!(master = %master, "mock master unreachable, session will abort");
        }
        Ok(Box::new(session))
    }
}

/// Scripts the master side of a mock session and observes issued commands
pub struct MasterHandle {
    state: Arc<Mutex<MasterState>>,
    event_tx: mpsc::UnboundedSender<MasterEvent>,
    command_rx: mpsc::UnboundedReceiver<Command>,
    ack_policy: AckPolicy,
}

impl MasterHandle {
    fn send(&self, event: MasterEvent) {
        // A dropped session simply stops listening.
        let _ = self.event_tx.send(event);
    }

    /// Register the framework. The first registration delivers
    /// `Registered`; later ones (failovers) deliver `Reregistered`.
    pub fn register(&self) {
        self.send(MasterEvent::Register);
    }

    /// Build an offer for an agent without granting it yet
    pub fn make_offer(&self, agent: &str, resources: Vec<Resource>) -> Offer {
        Offer {
            id: OfferId::new(Uuid::new_v4().to_string()),
            agent_id: AgentId::new(agent),
            hostname: agent.to_string(),
            resources,
        }
    }

    /// Grant a batch of offers in a single event
    pub fn send_offers(&self, offers: Vec<Offer>) {
        {
            let mut state = lock(&self.state);
            for offer in &offers {
                state.outstanding_offers.insert(offer.id.clone());
            }
        }
        self.send(MasterEvent::Offers(offers));
    }

    /// Grant a single offer, returning its id
    pub fn offer(&self, agent: &str, resources: Vec<Resource>) -> OfferId {
        let offer = self.make_offer(agent, resources);
        let offer_id = offer.id.clone();
        self.send_offers(vec![offer]);
        offer_id
    }

    /// Invalidate an outstanding offer
    pub fn rescind(&self, offer_id: &OfferId) {
        lock(&self.state).outstanding_offers.remove(offer_id);
        self.send(MasterEvent::Rescind(offer_id.clone()));
    }

    /// Deliver a status update. Under explicit acknowledgement an ack
    /// token is attached if the status does not already carry one.
    pub fn update(&self, mut status: TaskStatus) {
        if status.timestamp.is_none() {
            status.timestamp = Some(Utc::now());
        }
        if self.ack_policy == AckPolicy::Explicit && status.ack_token.is_none() {
            status.ack_token = Some(Uuid::new_v4());
        }
        self.send(MasterEvent::Update(status));
    }

    /// Deliver an out-of-band executor message
    pub fn message(&self, executor: &str, agent: &str, data: impl Into<Bytes>) {
        self.send(MasterEvent::Message {
            executor_id: ExecutorId::new(executor),
            agent_id: AgentId::new(agent),
            data: data.into(),
        });
    }

    /// Drop the connection; outstanding offers become invalid
    pub fn disconnect(&self) {
        lock(&self.state).outstanding_offers.clear();
        self.send(MasterEvent::Disconnect);
    }

    /// Report an agent as unreachable
    pub fn agent_lost(&self, agent: &str) {
        self.send(MasterEvent::AgentLost(AgentId::new(agent)));
    }

    /// Report an executor termination
    pub fn executor_lost(&self, executor: &str, agent: &str, status: i32) {
        self.send(MasterEvent::ExecutorLost {
            executor_id: ExecutorId::new(executor),
            agent_id: AgentId::new(agent),
            status,
        });
    }

    /// Abort the session with an unrecoverable error
    pub fn fail(&self, message: impl Into<String>) {
        self.send(MasterEvent::Fail(message.into()));
    }

    /// Gracefully terminate the session
    pub fn shutdown(&self) {
        self.send(MasterEvent::Shutdown);
    }

    /// Await the next command issued by the framework; `None` once the
    /// session is gone
    pub async fn next_command(&mut self) -> Option<Command> {
        self.command_rx.recv().await
    }

    /// A command already issued, if any, without waiting
    pub fn try_next_command(&mut self) -> Option<Command> {
        self.command_rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skiff_core::TaskId;
    use std::time::Duration;

    fn test_framework() -> FrameworkInfo {
        FrameworkInfo::new("test-framework")
    }

    fn test_endpoint() -> MasterEndpoint {
        MasterEndpoint::parse("master.test:5050").unwrap()
    }

    fn explicit_config() -> DriverConfig {
        DriverConfig {
            ack_policy: AckPolicy::Explicit,
            status_retry_interval: Duration::from_millis(100),
        }
    }

    async fn start(driver: &MockDriver) -> Box<dyn DriverSession> {
        driver.start(&test_framework(), &test_endpoint()).await.unwrap()
    }

    fn expect_event(event: SessionEvent) -> SchedulerEvent {
        match event {
            SessionEvent::Event(event) => event,
            SessionEvent::Terminated(state) => panic!("unexpected termination: {}", state),
        }
    }

    #[tokio::test]
    async fn test_register_then_reregister() {
        let (driver, handle) = MockDriver::new(DriverConfig::default());
        let mut session = start(&driver).await;

        handle.register();
        let first = expect_event(session.next_event().await);
        let framework_id = match first {
            SchedulerEvent::Registered { framework_id, .. } => framework_id,
            other => panic!("expected Registered, got {:?}", other),
        };
        assert!(!framework_id.as_str().is_empty());

        handle.register();
        match expect_event(session.next_event().await) {
            SchedulerEvent::Reregistered { .. } => {}
            other => panic!("expected Reregistered, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_decline_consumes_offer() {
        let (driver, mut handle) = MockDriver::new(DriverConfig::default());
        let mut session = start(&driver).await;
        let commands = session.commands();

        let offer_id = handle.offer("agent-1", vec![Resource::scalar("cpus", 2.0)]);
        match expect_event(session.next_event().await) {
            SchedulerEvent::Offers { offers } => assert_eq!(offers[0].id, offer_id),
            other => panic!("expected Offers, got {:?}", other),
        }

        commands.decline(&offer_id);
        assert_eq!(
            handle.next_command().await,
            Some(Command::Decline(offer_id.clone()))
        );

        // the offer is consumed: a later launch against it loses the task
        commands.launch(&offer_id, vec![TaskSpec::new(TaskId::new("t-1"), "late")]);
        match expect_event(session.next_event().await) {
            SchedulerEvent::StatusUpdate { status } => {
                assert_eq!(status.task_id, TaskId::new("t-1"));
                assert_eq!(status.state, TaskState::Lost);
            }
            other => panic!("expected Lost status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_launch_on_rescinded_offer_is_lost() {
        let (driver, handle) = MockDriver::new(DriverConfig::default());
        let mut session = start(&driver).await;
        let commands = session.commands();

        let offer_id = handle.offer("agent-1", vec![Resource::scalar("cpus", 2.0)]);
        expect_event(session.next_event().await);

        handle.rescind(&offer_id);
        match expect_event(session.next_event().await) {
            SchedulerEvent::OfferRescinded { offer_id: rescinded } => {
                assert_eq!(rescinded, offer_id)
            }
            other => panic!("expected OfferRescinded, got {:?}", other),
        }

        commands.launch(&offer_id, vec![TaskSpec::new(TaskId::new("t-1"), "racy")]);
        match expect_event(session.next_event().await) {
            SchedulerEvent::StatusUpdate { status } => {
                assert_eq!(status.state, TaskState::Lost);
                assert!(status.message.unwrap().contains("invalid offer"));
            }
            other => panic!("expected Lost status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_launch_on_valid_offer_records_command() {
        let (driver, mut handle) = MockDriver::new(DriverConfig::default());
        let mut session = start(&driver).await;
        let commands = session.commands();

        let offer_id = handle.offer("agent-1", vec![Resource::scalar("cpus", 2.0)]);
        expect_event(session.next_event().await);

        let tasks = vec![TaskSpec::new(TaskId::new("t-1"), "worker")];
        commands.launch(&offer_id, tasks.clone());
        assert_eq!(
            handle.next_command().await,
            Some(Command::Launch { offer_id, tasks })
        );

        commands.revive_offers();
        assert_eq!(handle.next_command().await, Some(Command::ReviveOffers));
    }

    #[tokio::test]
    async fn test_disconnect_invalidates_outstanding_offers() {
        let (driver, handle) = MockDriver::new(DriverConfig::default());
        let mut session = start(&driver).await;
        let commands = session.commands();

        let offer_id = handle.offer("agent-1", vec![Resource::scalar("cpus", 2.0)]);
        expect_event(session.next_event().await);

        handle.disconnect();
        match expect_event(session.next_event().await) {
            SchedulerEvent::Disconnected => {}
            other => panic!("expected Disconnected, got {:?}", other),
        }

        commands.launch(&offer_id, vec![TaskSpec::new(TaskId::new("t-1"), "stale")]);
        match expect_event(session.next_event().await) {
            SchedulerEvent::StatusUpdate { status } => assert_eq!(status.state, TaskState::Lost),
            other => panic!("expected Lost status, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_unacked_update_is_redelivered() {
        let (driver, handle) = MockDriver::new(explicit_config());
        let mut session = start(&driver).await;

        handle.update(TaskStatus::new(TaskId::new("t-1"), TaskState::Running));

        let first = match expect_event(session.next_event().await) {
            SchedulerEvent::StatusUpdate { status } => status,
            other => panic!("expected StatusUpdate, got {:?}", other),
        };
        assert!(first.needs_ack());

        // not acknowledged: the identical update comes around again
        let second = match expect_event(session.next_event().await) {
            SchedulerEvent::StatusUpdate { status } => status,
            other => panic!("expected redelivered StatusUpdate, got {:?}", other),
        };
        assert_eq!(second.task_id, first.task_id);
        assert_eq!(second.state, first.state);
        assert_eq!(second.ack_token, first.ack_token);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acknowledged_update_is_not_redelivered() {
        let (driver, mut handle) = MockDriver::new(explicit_config());
        let mut session = start(&driver).await;
        let commands = session.commands();

        handle.update(TaskStatus::new(TaskId::new("t-1"), TaskState::Finished));
        let status = match expect_event(session.next_event().await) {
            SchedulerEvent::StatusUpdate { status } => status,
            other => panic!("expected StatusUpdate, got {:?}", other),
        };

        commands.acknowledge(&status);
        match handle.next_command().await {
            Some(Command::Acknowledge { task_id, .. }) => {
                assert_eq!(task_id, TaskId::new("t-1"))
            }
            other => panic!("expected Acknowledge, got {:?}", other),
        }

        // nothing pending, so the session only terminates
        handle.shutdown();
        match session.next_event().await {
            SessionEvent::Terminated(TerminalState::Stopped) => {}
            other => panic!("expected Stopped, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_implicit_mode_attaches_no_ack_token() {
        let (driver, handle) = MockDriver::new(DriverConfig::default());
        let mut session = start(&driver).await;

        handle.update(TaskStatus::new(TaskId::new("t-1"), TaskState::Running));
        match expect_event(session.next_event().await) {
            SchedulerEvent::StatusUpdate { status } => assert!(!status.needs_ack()),
            other => panic!("expected StatusUpdate, got {:?}", other),
        }

        handle.shutdown();
        match session.next_event().await {
            SessionEvent::Terminated(TerminalState::Stopped) => {}
            other => panic!("expected Stopped, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let (driver, _handle) = MockDriver::new(DriverConfig::default());
        let mut session = start(&driver).await;
        let commands = session.commands();

        session.stop();
        session.stop();
        commands.stop();

        match session.next_event().await {
            SessionEvent::Terminated(TerminalState::Stopped) => {}
            other => panic!("expected Stopped, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fail_aborts_and_drops_later_commands() {
        let (driver, mut handle) = MockDriver::new(DriverConfig::default());
        let mut session = start(&driver).await;
        let commands = session.commands();

        handle.fail("master state corrupted");
        match expect_event(session.next_event().await) {
            SchedulerEvent::Error { message } => {
                assert_eq!(message, "master state corrupted")
            }
            other => panic!("expected Error, got {:?}", other),
        }

        // the driver is already aborted: commands go nowhere
        commands.decline(&OfferId::new("o-1"));
        commands.revive_offers();
        assert!(handle.try_next_command().is_none());

        match session.next_event().await {
            SessionEvent::Terminated(TerminalState::Aborted) => {}
            other => panic!("expected Aborted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_master_surfaces_error_event() {
        let (driver, _handle) = MockDriver::unreachable(DriverConfig::default());
        let mut session = start(&driver).await;

        match expect_event(session.next_event().await) {
            SchedulerEvent::Error { message } => {
                assert!(message.contains("master.test:5050"))
            }
            other => panic!("expected Error, got {:?}", other),
        }
        match session.next_event().await {
            SessionEvent::Terminated(TerminalState::Aborted) => {}
            other => panic!("expected Aborted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_second_start_fails() {
        let (driver, _handle) = MockDriver::new(DriverConfig::default());
        let _session = start(&driver).await;

        let result = driver.start(&test_framework(), &test_endpoint()).await;
        assert!(matches!(
            result.unwrap_err(),
            DriverError::SessionAlreadyActive
        ));
    }

    #[tokio::test]
    async fn test_framework_message_and_losses_pass_through() {
        let (driver, handle) = MockDriver::new(DriverConfig::default());
        let mut session = start(&driver).await;

        handle.message("executor-1", "agent-1", &b"ping"[..]);
        match expect_event(session.next_event().await) {
            SchedulerEvent::FrameworkMessage { data, .. } => assert_eq!(&data[..], b"ping"),
            other => panic!("expected FrameworkMessage, got {:?}", other),
        }

        handle.agent_lost("agent-1");
        match expect_event(session.next_event().await) {
            SchedulerEvent::AgentLost { agent_id } => {
                assert_eq!(agent_id, AgentId::new("agent-1"))
            }
            other => panic!("expected AgentLost, got {:?}", other),
        }

        handle.executor_lost("executor-1", "agent-1", 137);
        match expect_event(session.next_event().await) {
            SchedulerEvent::ExecutorLost { status, .. } => assert_eq!(status, 137),
            other => panic!("expected ExecutorLost, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_preassigned_framework_id_survives_registration() {
        let (driver, handle) = MockDriver::new(DriverConfig::default());
        let framework = FrameworkInfo {
            id: Some(FrameworkId::new("fw-previous")),
            ..test_framework()
        };
        let mut session = driver.start(&framework, &test_endpoint()).await.unwrap();

        handle.register();
        match expect_event(session.next_event().await) {
            SchedulerEvent::Registered { framework_id, .. } => {
                assert_eq!(framework_id, FrameworkId::new("fw-previous"))
            }
            other => panic!("expected Registered, got {:?}", other),
        }
    }
}
