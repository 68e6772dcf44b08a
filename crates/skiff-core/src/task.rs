use crate::resources::Resource;
use crate::types::{AgentId, ExecutorId, TaskId};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// State of a task as reported by the master
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Accepted by the master, not yet handed to an executor
    Staging,
    /// Executor is launching the task
    Starting,
    Running,
    /// Kill requested, not yet confirmed
    Killing,
    Finished,
    Failed,
    Killed,
    /// Task or its agent/offer became unreachable or invalid
    Lost,
    Error,
}

impl TaskState {
    /// Whether no further state transitions will occur for the task
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Finished
                | TaskState::Failed
                | TaskState::Killed
                | TaskState::Lost
                | TaskState::Error
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskState::Staging => "staging",
            TaskState::Starting => "starting",
            TaskState::Running => "running",
            TaskState::Killing => "killing",
            TaskState::Finished => "finished",
            TaskState::Failed => "failed",
            TaskState::Killed => "killed",
            TaskState::Lost => "lost",
            TaskState::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// A task state change reported by the master.
///
/// When `ack_token` is present the update is delivered under explicit
/// acknowledgement: the framework must acknowledge it exactly once or the
/// master redelivers the identical update indefinitely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub task_id: TaskId,
    pub state: TaskState,
    pub message: Option<String>,
    pub agent_id: Option<AgentId>,
    pub executor_id: Option<ExecutorId>,
    pub timestamp: Option<DateTime<Utc>>,
    pub ack_token: Option<Uuid>,
}

impl TaskStatus {
    /// Create a status update with no optional fields
    pub fn new(task_id: TaskId, state: TaskState) -> Self {
        Self {
            task_id,
            state,
            message: None,
            agent_id: None,
            executor_id: None,
            timestamp: None,
            ack_token: None,
        }
    }

    /// Attach a human-readable message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach the reporting agent
    pub fn with_agent(mut self, agent_id: AgentId) -> Self {
        self.agent_id = Some(agent_id);
        self
    }

    /// Whether this update requires an explicit acknowledgement
    pub fn needs_ack(&self) -> bool {
        self.ack_token.is_some()
    }
}

/// Description of a task to launch against an offer
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
    pub task_id: TaskId,
    pub name: String,
    pub resources: Vec<Resource>,
    /// Opaque payload handed to the executor
    pub data: Bytes,
}

impl TaskSpec {
    /// Create a task spec with no resources or payload
    pub fn new(task_id: TaskId, name: impl Into<String>) -> Self {
        Self {
            task_id,
            name: name.into(),
            resources: Vec::new(),
            data: Bytes::new(),
        }
    }

    /// Set the resources the task consumes from the offer
    pub fn with_resources(mut self, resources: Vec<Resource>) -> Self {
        self.resources = resources;
        self
    }

    /// Set the executor payload
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }
}
