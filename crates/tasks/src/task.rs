use core::str::FromStr;

use serde::{Deserialize, Serialize};

use robodepot_core::{DomainError, DomainResult, Entity, EntityKind, RobotId, TaskId};

/// Task lifecycle: `pending → in-progress → completed`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// The only status this one may move to, if any.
    pub fn successor(&self) -> Option<TaskStatus> {
        match self {
            TaskStatus::Pending => Some(TaskStatus::InProgress),
            TaskStatus::InProgress => Some(TaskStatus::Completed),
            TaskStatus::Completed => None,
        }
    }

    /// Check a requested move. Staying put is allowed; otherwise only one step forward.
    pub fn check_transition(self, to: TaskStatus) -> DomainResult<()> {
        if self == to || self.successor() == Some(to) {
            Ok(())
        } else {
            Err(DomainError::invalid_transition(self, to))
        }
    }
}

impl core::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" | "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(DomainError::validation(format!("unknown task status: {other:?}"))),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl core::fmt::Display for Priority {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(DomainError::validation(format!("unknown priority: {other:?}"))),
        }
    }
}

/// A warehouse task.
///
/// `assigned_robot` is advisory: nothing guarantees the robot exists, and
/// readers must tolerate a reference that resolves to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    status: TaskStatus,
    priority: Priority,
    source: String,
    destination: String,
    #[serde(default)]
    assigned_robot: Option<RobotId>,
}

impl Task {
    pub fn new(
        id: TaskId,
        status: TaskStatus,
        priority: Priority,
        source: impl Into<String>,
        destination: impl Into<String>,
        assigned_robot: Option<RobotId>,
    ) -> Self {
        Self {
            id,
            status,
            priority,
            source: source.into(),
            destination: destination.into(),
            assigned_robot,
        }
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn assigned_robot(&self) -> Option<&RobotId> {
        self.assigned_robot.as_ref()
    }

    /// Move along the lifecycle. Returns whether the status changed.
    pub fn transition(&mut self, to: TaskStatus) -> DomainResult<bool> {
        self.status.check_transition(to)?;
        let changed = self.status != to;
        self.status = to;
        Ok(changed)
    }

    /// Set or clear the robot reference. Returns whether it changed.
    pub fn assign(&mut self, robot: Option<RobotId>) -> bool {
        if self.assigned_robot == robot {
            return false;
        }
        self.assigned_robot = robot;
        true
    }
}

impl Entity for Task {
    type Id = TaskId;
    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A task as submitted by the view layer; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(default = "NewTask::default_status")]
    pub status: TaskStatus,
    pub priority: Priority,
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub assigned_robot: Option<RobotId>,
}

impl NewTask {
    pub fn new(priority: Priority, source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Pending,
            priority,
            source: source.into(),
            destination: destination.into(),
            assigned_robot: None,
        }
    }

    pub fn assigned_to(mut self, robot: RobotId) -> Self {
        self.assigned_robot = Some(robot);
        self
    }

    fn default_status() -> TaskStatus {
        TaskStatus::Pending
    }

    /// Structural checks only; the robot reference is not resolved.
    pub fn into_task(self, id: TaskId) -> DomainResult<Task> {
        let source = self.source.trim();
        let destination = self.destination.trim();
        if source.is_empty() {
            return Err(DomainError::validation("source location cannot be empty"));
        }
        if destination.is_empty() {
            return Err(DomainError::validation("destination location cannot be empty"));
        }
        Ok(Task::new(
            id,
            self.status,
            self.priority,
            source,
            destination,
            self.assigned_robot,
        ))
    }
}
