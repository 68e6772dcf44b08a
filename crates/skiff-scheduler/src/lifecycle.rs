use crate::error::Result;
use crate::scheduler::{dispatch, Scheduler};
use skiff_core::{FrameworkInfo, MasterEndpoint, TerminalState};
use skiff_driver::{DriverConnector, DriverSession, SessionEvent};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Owns the driver session for the span of one run.
///
/// The session is stopped when the guard drops, so the driver is released
/// on every exit path out of [`Lifecycle::run`] — normal return, error,
/// or a panic unwinding out of an event handler.
struct SessionGuard {
    session: Box<dyn DriverSession>,
}

impl SessionGuard {
    fn new(session: Box<dyn DriverSession>) -> Self {
        Self { session }
    }

    fn session_mut(&mut self) -> &mut dyn DriverSession {
        self.session.as_mut()
    }

    fn stop(&self) {
        self.session.stop();
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.session.stop();
    }
}

/// Run-loop binding one framework identity to one master endpoint.
///
/// A constructed value is the created state; [`run`](Lifecycle::run) is
/// the running state; the returned [`TerminalState`] is the terminal
/// state. The session is held exclusively inside `run`, so exactly one
/// lifecycle drives a given framework identity at a time — a second
/// concurrent driver would be treated by the master as a failover.
pub struct Lifecycle {
    framework: FrameworkInfo,
    master: MasterEndpoint,
}

impl Lifecycle {
    /// Create a lifecycle bound to a framework identity and endpoint
    pub fn new(framework: FrameworkInfo, master: MasterEndpoint) -> Self {
        Self { framework, master }
    }

    /// Start the driver, dispatch events until the driver reports a
    /// terminal outcome, then stop it once more unconditionally.
    ///
    /// Cancelling `shutdown` requests a driver stop; the loop still
    /// drains to the driver-reported terminal state. Handler failures are
    /// not caught: a panic inside a handler unwinds through this call
    /// (the guard still stops the session) and is fatal to the process —
    /// restarting is the job of outside supervision.
    pub async fn run(
        self,
        connector: &dyn DriverConnector,
        mut scheduler: Box<dyn Scheduler>,
        shutdown: CancellationToken,
    ) -> Result<TerminalState> {
        self.framework.validate()?;
        info!(
            framework = %self.framework.name,
            master = %self.master,
            "starting scheduler driver"
        );

        let session = connector.start(&self.framework, &self.master).await?;
        let mut guard = SessionGuard::new(session);
        let commands = guard.session_mut().commands();

        // External shutdown funnels into the driver's own idempotent stop.
        let stopper = {
            let commands = commands.clone();
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                shutdown.cancelled().await;
                info!("shutdown requested, stopping driver");
                commands.stop();
            })
        };

        let terminal = loop {
            match guard.session_mut().next_event().await {
                SessionEvent::Event(event) => {
                    dispatch(scheduler.as_mut(), commands.as_ref(), event).await
                }
                SessionEvent::Terminated(terminal) => break terminal,
            }
        };
        stopper.abort();

        // Stop once more even if the driver self-stopped; the session
        // contract makes this safe on an already-stopped adapter.
        guard.stop();

        match terminal {
            TerminalState::Stopped => info!("driver stopped"),
            TerminalState::Aborted => warn!("driver aborted"),
        }
        Ok(terminal)
    }
}
