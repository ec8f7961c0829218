use std::fmt;
use std::str::FromStr;
use serde::Serialize;

use crate::error::DecodeError;

/// Identifier of a task, unique within a store. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(u32);

impl TaskId {
    pub const FIRST: TaskId = TaskId(1);

    /// Returns `None` for zero
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The id that follows this one, `None` past `u32::MAX`
    pub(crate) fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>()
            .ok()
            .and_then(TaskId::new)
            .ok_or_else(|| DecodeError::InvalidId(s.to_string()))
    }
}

/// Priority level of a prioritized task, always within `1..=5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Value substituted for out-of-range input at construction
    pub const DEFAULT: Priority = Priority(Self::MIN);

    /// Returns `None` when `value` is outside `1..=5`
    pub fn new(value: i64) -> Option<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    /// Out-of-range input silently becomes [`Priority::DEFAULT`]
    pub fn clamped(value: i64) -> Self {
        Self::new(value).unwrap_or(Self::DEFAULT)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::DEFAULT
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind-specific part of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskKind {
    /// Legacy untagged record shape; only produced by decoding
    Base,
    Plain,
    Deadline {
        /// Free-form text, never parsed as a date
        due: String,
    },
    Prioritized {
        priority: Priority,
    },
}

impl TaskKind {
    /// Label shown in the human-readable summary
    pub fn label(&self) -> Option<&'static str> {
        match self {
            TaskKind::Base => None,
            TaskKind::Plain => Some("Simple"),
            TaskKind::Deadline { .. } => Some("Deadline"),
            TaskKind::Prioritized { .. } => Some("Prioritized"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    description: String,
    completed: bool,
    #[serde(flatten)]
    kind: TaskKind,
}

impl Task {
    pub(crate) fn new(id: TaskId, description: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            id,
            description: description.into(),
            completed: false,
            kind,
        }
    }

    pub(crate) fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Due text for deadline tasks
    pub fn due(&self) -> Option<&str> {
        match &self.kind {
            TaskKind::Deadline { due } => Some(due),
            _ => None,
        }
    }

    /// Returns false if this is not a deadline task
    pub fn set_due(&mut self, new_due: impl Into<String>) -> bool {
        match &mut self.kind {
            TaskKind::Deadline { due } => {
                *due = new_due.into();
                true
            }
            _ => false,
        }
    }

    pub fn priority(&self) -> Option<Priority> {
        match self.kind {
            TaskKind::Prioritized { priority } => Some(priority),
            _ => None,
        }
    }

    /// Out-of-range values are ignored and the prior priority is kept.
    /// Returns whether the new value was applied.
    pub fn set_priority(&mut self, value: i64) -> bool {
        match (&mut self.kind, Priority::new(value)) {
            (TaskKind::Prioritized { priority }, Some(new_priority)) => {
                *priority = new_priority;
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Description: {}, Completed: {}",
            self.id,
            self.description,
            if self.completed { "Yes" } else { "No" }
        )?;

        match &self.kind {
            TaskKind::Deadline { due } => write!(f, ", Due: {}", due)?,
            TaskKind::Prioritized { priority } => write!(f, ", Priority: {}", priority)?,
            TaskKind::Base | TaskKind::Plain => {}
        }

        if let Some(label) = self.kind.label() {
            write!(f, " ({})", label)?;
        }
        Ok(())
    }
}

/// Input for [`TaskStore::add`](crate::store::TaskStore::add); the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewTask {
    Plain { description: String },
    Deadline { description: String, due: String },
    Prioritized { description: String, priority: i64 },
}

impl NewTask {
    pub fn plain(description: impl Into<String>) -> Self {
        NewTask::Plain { description: description.into() }
    }

    pub fn deadline(description: impl Into<String>, due: impl Into<String>) -> Self {
        NewTask::Deadline {
            description: description.into(),
            due: due.into(),
        }
    }

    /// `priority` outside `1..=5` is clamped to the default when the task is built
    pub fn prioritized(description: impl Into<String>, priority: i64) -> Self {
        NewTask::Prioritized {
            description: description.into(),
            priority,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            NewTask::Plain { description }
            | NewTask::Deadline { description, .. }
            | NewTask::Prioritized { description, .. } => description,
        }
    }

    pub(crate) fn into_task(self, id: TaskId) -> Task {
        match self {
            NewTask::Plain { description } => Task::new(id, description, TaskKind::Plain),
            NewTask::Deadline { description, due } => {
                Task::new(id, description, TaskKind::Deadline { due })
            }
            NewTask::Prioritized { description, priority } => Task::new(
                id,
                description,
                TaskKind::Prioritized {
                    priority: Priority::clamped(priority),
                },
            ),
        }
    }
}
