//! Task entity and the field groups the board mutates.

use super::{ParsePriorityError, ParseTaskStatusError, TaskId, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column membership of a task; the only server-authoritative classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    Pending,
    /// Work is under way.
    InProgress,
    /// Work is finished.
    Completed,
}

impl TaskStatus {
    /// All statuses in board column order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Returns the canonical wire and column identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task priority, edited by cycling through the three levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Lowest priority.
    Low,
    /// Default priority.
    #[default]
    Medium,
    /// Highest priority.
    High,
}

impl Priority {
    /// Returns the next priority in the `Low → Medium → High → Low` cycle.
    #[must_use]
    pub const fn cycled(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

/// Groups of task fields that a single mutation touches together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskField {
    /// The `status` field.
    Status,
    /// The `priority` field.
    Priority,
    /// The `assigned_to` and `due_date` fields.
    Assignment,
    /// The `title` and `description` fields.
    Content,
}

impl TaskField {
    /// Returns a stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Assignment => "assignment",
            Self::Content => "content",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact copy of one field group, used to restore a task after a failed
/// remote write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSnapshot {
    /// Captured status.
    Status(TaskStatus),
    /// Captured priority.
    Priority(Priority),
    /// Captured assignee and due date.
    Assignment {
        /// Assignee at capture time.
        assigned_to: Option<UserId>,
        /// Due date at capture time.
        due_date: Option<NaiveDate>,
    },
    /// Captured title and description.
    Content {
        /// Title at capture time.
        title: String,
        /// Description at capture time.
        description: String,
    },
}

impl FieldSnapshot {
    /// Returns the field group this snapshot covers.
    #[must_use]
    pub const fn field(&self) -> TaskField {
        match self {
            Self::Status(_) => TaskField::Status,
            Self::Priority(_) => TaskField::Priority,
            Self::Assignment { .. } => TaskField::Assignment,
            Self::Content { .. } => TaskField::Content,
        }
    }
}

/// Report-disclosure task shown as a card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    status: TaskStatus,
    priority: Priority,
    due_date: Option<NaiveDate>,
    assigned_to: Option<UserId>,
    title: String,
    description: String,
}

/// Parameter object for reconstructing a task fetched from the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskData {
    /// Task identifier.
    pub id: TaskId,
    /// Column membership.
    pub status: TaskStatus,
    /// Priority level.
    pub priority: Priority,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Optional assignee.
    pub assigned_to: Option<UserId>,
    /// Card title.
    pub title: String,
    /// Card description.
    pub description: String,
}

impl Task {
    /// Creates a pending, medium-priority, unassigned task.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            status: TaskStatus::Pending,
            priority: Priority::default(),
            due_date: None,
            assigned_to: None,
            title: title.into(),
            description: String::new(),
        }
    }

    /// Reconstructs a task from remote data.
    #[must_use]
    pub fn from_data(data: TaskData) -> Self {
        Self {
            id: data.id,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            assigned_to: data.assigned_to,
            title: data.title,
            description: data.description,
        }
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the assignee and due date.
    #[must_use]
    pub fn with_assignment(mut self, assigned_to: UserId, due_date: Option<NaiveDate>) -> Self {
        self.assigned_to = Some(assigned_to);
        self.due_date = due_date;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the column membership.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<&UserId> {
        self.assigned_to.as_ref()
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Captures the current values of a field group.
    #[must_use]
    pub fn snapshot(&self, field: TaskField) -> FieldSnapshot {
        match field {
            TaskField::Status => FieldSnapshot::Status(self.status),
            TaskField::Priority => FieldSnapshot::Priority(self.priority),
            TaskField::Assignment => FieldSnapshot::Assignment {
                assigned_to: self.assigned_to.clone(),
                due_date: self.due_date,
            },
            TaskField::Content => FieldSnapshot::Content {
                title: self.title.clone(),
                description: self.description.clone(),
            },
        }
    }

    /// Writes a snapshot back, touching only the fields it covers.
    pub fn restore(&mut self, snapshot: FieldSnapshot) {
        match snapshot {
            FieldSnapshot::Status(status) => self.status = status,
            FieldSnapshot::Priority(priority) => self.priority = priority,
            FieldSnapshot::Assignment {
                assigned_to,
                due_date,
            } => {
                self.assigned_to = assigned_to;
                self.due_date = due_date;
            }
            FieldSnapshot::Content { title, description } => {
                self.title = title;
                self.description = description;
            }
        }
    }
}
