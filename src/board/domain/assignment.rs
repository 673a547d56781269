//! Assignment values produced by the assignment workflow.
//!
//! An [`Assignment`] is transient: it is built when the workflow submits,
//! translated into a mutation of the task's `assigned_to` and `due_date`
//! fields plus an [`AssignmentPayload`] for the remote API, and discarded.

use super::{BoardDomainError, TaskId, UserId};
use chrono::{Datelike, NaiveDate};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an assignment is due once or every month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentType {
    /// Due on a single calendar date.
    #[default]
    OneTime,
    /// Due on the same day every month.
    Recurring,
}

impl AssignmentType {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneTime => "one_time",
            Self::Recurring => "recurring",
        }
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day of month in `1..=31` on which a recurring assignment falls due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MonthlyDueDay(u32);

impl MonthlyDueDay {
    /// Creates a validated due day.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidMonthlyDueDay`] outside `1..=31`.
    pub fn new(day: u32) -> Result<Self, BoardDomainError> {
        if !(1..=31).contains(&day) {
            return Err(BoardDomainError::InvalidMonthlyDueDay(day.to_string()));
        }
        Ok(Self(day))
    }

    /// Parses form input such as `"15"` or `"05"`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidMonthlyDueDay`] when the input is
    /// not a number in `1..=31`.
    pub fn parse(input: &str) -> Result<Self, BoardDomainError> {
        let day = input
            .trim()
            .parse::<u32>()
            .map_err(|_| BoardDomainError::InvalidMonthlyDueDay(input.to_owned()))?;
        Self::new(day).map_err(|_| BoardDomainError::InvalidMonthlyDueDay(input.to_owned()))
    }

    /// Returns the day number.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the due date in the given month.
    ///
    /// Days past the end of a short month fall on its last day, so `31`
    /// resolves to 30 April or 28/29 February.
    #[must_use]
    pub fn in_month(self, year: i32, month: u32) -> Option<NaiveDate> {
        (1..=self.0)
            .rev()
            .find_map(|day| NaiveDate::from_ymd_opt(year, month, day))
    }
}

impl TryFrom<u32> for MonthlyDueDay {
    type Error = BoardDomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MonthlyDueDay> for u32 {
    fn from(value: MonthlyDueDay) -> Self {
        value.0
    }
}

/// Due-date rule of an assignment; one-time and recurring are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssignmentSchedule {
    /// Due once on `due_date`.
    OneTime {
        /// Calendar due date.
        due_date: NaiveDate,
    },
    /// Due every month on `monthly_due_day`.
    Recurring {
        /// Day of month.
        monthly_due_day: MonthlyDueDay,
    },
}

impl AssignmentSchedule {
    /// Returns the assignment type this schedule belongs to.
    #[must_use]
    pub const fn assignment_type(&self) -> AssignmentType {
        match self {
            Self::OneTime { .. } => AssignmentType::OneTime,
            Self::Recurring { .. } => AssignmentType::Recurring,
        }
    }
}

/// Assignment of a task to an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    employee_id: UserId,
    schedule: AssignmentSchedule,
    notes: String,
    due_date: NaiveDate,
}

impl Assignment {
    /// Builds an assignment, deriving the task due date.
    ///
    /// One-time assignments use their own date. Recurring assignments fall
    /// due in the current month of the user's local calendar (per `clock`)
    /// on the monthly due day.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidMonthlyDueDay`] if the due day cannot
    /// be placed in the current month.
    pub fn new(
        employee_id: UserId,
        schedule: AssignmentSchedule,
        notes: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, BoardDomainError> {
        let due_date = match schedule {
            AssignmentSchedule::OneTime { due_date } => due_date,
            AssignmentSchedule::Recurring { monthly_due_day } => {
                let today = clock.local().date_naive();
                monthly_due_day
                    .in_month(today.year(), today.month())
                    .ok_or_else(|| {
                        BoardDomainError::InvalidMonthlyDueDay(monthly_due_day.value().to_string())
                    })?
            }
        };

        Ok(Self {
            employee_id,
            schedule,
            notes: notes.into(),
            due_date,
        })
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn employee_id(&self) -> &UserId {
        &self.employee_id
    }

    /// Returns the due-date rule.
    #[must_use]
    pub const fn schedule(&self) -> AssignmentSchedule {
        self.schedule
    }

    /// Returns the assignment type.
    #[must_use]
    pub const fn assignment_type(&self) -> AssignmentType {
        self.schedule.assignment_type()
    }

    /// Returns the free-text notes.
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Returns the due date written into the task.
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Builds the remote payload for the given task.
    #[must_use]
    pub fn payload(&self, task_disclosure_id: TaskId) -> AssignmentPayload {
        AssignmentPayload {
            task_disclosure_id,
            assigned_to: self.employee_id.clone(),
            due_date: self.due_date,
            recurring: self.assignment_type() == AssignmentType::Recurring,
            notes: self.notes.clone(),
        }
    }
}

/// Body of the remote `persistAssignment` call.
///
/// `due_date` serialises as an ISO 8601 calendar date (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentPayload {
    /// Task being assigned.
    pub task_disclosure_id: TaskId,
    /// Assignee.
    pub assigned_to: UserId,
    /// Derived due date.
    pub due_date: NaiveDate,
    /// Whether the assignment recurs monthly.
    pub recurring: bool,
    /// Free-text notes.
    pub notes: String,
}

impl AssignmentPayload {
    /// Returns the due date in ISO 8601 form.
    #[must_use]
    pub fn due_date_iso(&self) -> String {
        self.due_date.format("%Y-%m-%d").to_string()
    }
}
