//! Two-step assignment dialog modelled as a state machine.
//!
//! ```text
//! UserSelection --next--> AssignmentDetails --submit--> Submitting
//!       ^                        |    ^                      |
//!       +---------back-----------+    +--resolve(failed)-----+
//!                                                            |
//!                                     Closed(Committed) <----+ resolve(confirmed)
//!
//! any open state --cancel--> Closed(Cancelled)
//! ```
//!
//! Guard failures leave the state unchanged and record a validation
//! message for the dialog to show.

use super::{
    board::check_length,
    config::BoardConfig,
    error::BoardError,
    mutator::{MutationOutcome, OptimisticMutator, PendingMutation},
};
use crate::board::{
    domain::{
        Assignment, AssignmentSchedule, AssignmentType, BoardDomainError, MonthlyDueDay,
        MutationRequest, Task, TaskId, TaskMutation, UserDirectory, UserId,
    },
    ports::TaskBoardApi,
};
use chrono::NaiveDate;
use mockable::Clock;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// How a closed dialog ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowClosure {
    /// The assignment was confirmed by the remote API.
    Committed,
    /// The dialog was dismissed without assigning.
    Cancelled,
}

/// Dialog state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// Choosing the employee.
    UserSelection,
    /// Entering due date, recurrence, and notes.
    AssignmentDetails,
    /// The assignment was applied and awaits remote confirmation.
    Submitting,
    /// The dialog is closed.
    Closed(WorkflowClosure),
}

impl WorkflowState {
    /// Returns a stable label for messages and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserSelection => "user_selection",
            Self::AssignmentDetails => "assignment_details",
            Self::Submitting => "submitting",
            Self::Closed(WorkflowClosure::Committed) => "committed",
            Self::Closed(WorkflowClosure::Cancelled) => "cancelled",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dialog actions, named in transition errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    /// Choose an employee.
    SelectUser,
    /// Advance to the details step.
    Next,
    /// Return to the user step.
    Back,
    /// Change a details field.
    EditDetails,
    /// Submit the assignment.
    Submit,
    /// Feed back the remote outcome.
    Resolve,
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SelectUser => "select a user",
            Self::Next => "continue",
            Self::Back => "go back",
            Self::EditDetails => "edit assignment details",
            Self::Submit => "submit",
            Self::Resolve => "resolve a submission",
        })
    }
}

/// Validation and transition errors raised by the dialog.
#[derive(Debug, Clone, Error)]
pub enum AssignmentWorkflowError {
    /// `next` was requested without a selected employee.
    #[error("select a user before continuing")]
    NoUserSelected,

    /// The selected employee is not in the user directory.
    #[error("unknown user: {0}")]
    UnknownUser(UserId),

    /// A one-time assignment was submitted without a due date.
    #[error("a due date is required for one-time assignments")]
    MissingDueDate,

    /// A recurring assignment was submitted without a monthly due day.
    #[error("a monthly due day is required for recurring assignments")]
    MissingMonthlyDueDay,

    /// A field value failed domain validation.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// The action is not available in the current state.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        /// State the dialog was in.
        state: WorkflowState,
        /// Rejected action.
        action: WorkflowAction,
    },

    /// Applying the assignment to the board failed.
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Result type for assignment workflow operations.
pub type WorkflowResult<T> = Result<T, AssignmentWorkflowError>;

/// Local form fields of the dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentForm {
    /// Selected employee.
    pub employee_id: Option<UserId>,
    /// One-time or recurring.
    pub assignment_type: AssignmentType,
    /// Due date for one-time assignments.
    pub due_date: Option<NaiveDate>,
    /// Raw monthly due day input for recurring assignments.
    pub monthly_due_day: String,
    /// Free-text notes.
    pub notes: String,
}

/// Assignment dialog for one task.
#[derive(Debug, Clone)]
pub struct AssignmentWorkflow {
    task_id: TaskId,
    state: WorkflowState,
    form: AssignmentForm,
    validation_message: Option<String>,
    alert: Option<String>,
    config: BoardConfig,
}

impl AssignmentWorkflow {
    /// Opens the dialog for `task`.
    ///
    /// A task that is already assigned starts with its assignee selected.
    #[must_use]
    pub fn open(task: &Task, config: BoardConfig) -> Self {
        let form = AssignmentForm {
            employee_id: task.assigned_to().cloned(),
            ..AssignmentForm::default()
        };
        Self {
            task_id: task.id().clone(),
            state: WorkflowState::UserSelection,
            form,
            validation_message: None,
            alert: None,
            config,
        }
    }

    /// Returns the task being assigned.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> WorkflowState {
        self.state
    }

    /// Returns `true` until the dialog closes.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self.state, WorkflowState::Closed(_))
    }

    /// Returns the form fields.
    #[must_use]
    pub const fn form(&self) -> &AssignmentForm {
        &self.form
    }

    /// Returns the message of the last rejected action.
    #[must_use]
    pub fn validation_message(&self) -> Option<&str> {
        self.validation_message.as_deref()
    }

    /// Returns the alert raised by a failed submission.
    #[must_use]
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Holds the selected employee without committing anything.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentWorkflowError::UnknownUser`] when `users` does not
    /// know the id, or [`AssignmentWorkflowError::InvalidTransition`] outside
    /// the user step.
    pub fn select_user(&mut self, users: &UserDirectory, user_id: UserId) -> WorkflowResult<()> {
        self.expect_state(WorkflowState::UserSelection, WorkflowAction::SelectUser)?;
        if !users.contains(&user_id) {
            return self.reject(AssignmentWorkflowError::UnknownUser(user_id));
        }
        self.form.employee_id = Some(user_id);
        self.validation_message = None;
        Ok(())
    }

    /// Advances to the details step.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentWorkflowError::NoUserSelected`] when no employee is
    /// selected; the state is unchanged.
    pub fn next(&mut self) -> WorkflowResult<()> {
        self.expect_state(WorkflowState::UserSelection, WorkflowAction::Next)?;
        if self.form.employee_id.is_none() {
            return self.reject(AssignmentWorkflowError::NoUserSelected);
        }
        self.enter(WorkflowState::AssignmentDetails);
        Ok(())
    }

    /// Returns to the user step, keeping the selection.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentWorkflowError::InvalidTransition`] outside the
    /// details step.
    pub fn back(&mut self) -> WorkflowResult<()> {
        self.expect_state(WorkflowState::AssignmentDetails, WorkflowAction::Back)?;
        self.enter(WorkflowState::UserSelection);
        Ok(())
    }

    /// Chooses between one-time and recurring.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentWorkflowError::InvalidTransition`] outside the
    /// details step.
    pub fn set_assignment_type(&mut self, assignment_type: AssignmentType) -> WorkflowResult<()> {
        self.expect_state(WorkflowState::AssignmentDetails, WorkflowAction::EditDetails)?;
        self.form.assignment_type = assignment_type;
        Ok(())
    }

    /// Sets or clears the one-time due date.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentWorkflowError::InvalidTransition`] outside the
    /// details step.
    pub fn set_due_date(&mut self, due_date: Option<NaiveDate>) -> WorkflowResult<()> {
        self.expect_state(WorkflowState::AssignmentDetails, WorkflowAction::EditDetails)?;
        self.form.due_date = due_date;
        Ok(())
    }

    /// Sets the raw monthly due day input.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentWorkflowError::InvalidTransition`] outside the
    /// details step.
    pub fn set_monthly_due_day(&mut self, day: impl Into<String>) -> WorkflowResult<()> {
        self.expect_state(WorkflowState::AssignmentDetails, WorkflowAction::EditDetails)?;
        self.form.monthly_due_day = day.into();
        Ok(())
    }

    /// Sets the notes.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentWorkflowError::InvalidTransition`] outside the
    /// details step.
    pub fn set_notes(&mut self, notes: impl Into<String>) -> WorkflowResult<()> {
        self.expect_state(WorkflowState::AssignmentDetails, WorkflowAction::EditDetails)?;
        self.form.notes = notes.into();
        Ok(())
    }

    /// Validates the form and applies the assignment optimistically.
    ///
    /// On success the dialog enters [`WorkflowState::Submitting`] and the
    /// returned pending mutation must be settled and passed to
    /// [`Self::resolve`].
    ///
    /// # Errors
    ///
    /// Returns a guard error ([`AssignmentWorkflowError::MissingDueDate`],
    /// [`AssignmentWorkflowError::MissingMonthlyDueDay`],
    /// [`AssignmentWorkflowError::Domain`]) or a board error; in every case
    /// the dialog stays in the details step and nothing is mutated.
    pub fn submit<A, C>(
        &mut self,
        mutator: &OptimisticMutator<A>,
        clock: &C,
    ) -> WorkflowResult<PendingMutation<A>>
    where
        A: TaskBoardApi,
        C: Clock,
    {
        self.expect_state(WorkflowState::AssignmentDetails, WorkflowAction::Submit)?;
        let assignment = match self.build_assignment(clock) {
            Ok(assignment) => assignment,
            Err(err) => return self.reject(err),
        };

        let request =
            MutationRequest::new(self.task_id.clone(), TaskMutation::Assign(assignment));
        let pending = match mutator.apply(request) {
            Ok(pending) => pending,
            Err(err) => return self.reject(err.into()),
        };

        debug!(task_id = %self.task_id, "assignment submitted");
        self.alert = None;
        self.enter(WorkflowState::Submitting);
        Ok(pending)
    }

    /// Feeds back the outcome of the submitted assignment.
    ///
    /// A confirmed write closes the dialog and clears the form. A failed or
    /// superseded write returns to the details step with an alert and the
    /// form intact. A dead-lettered result closes the dialog.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentWorkflowError::InvalidTransition`] unless the
    /// dialog is submitting.
    pub fn resolve(&mut self, outcome: &MutationOutcome) -> WorkflowResult<()> {
        self.expect_state(WorkflowState::Submitting, WorkflowAction::Resolve)?;
        match outcome {
            MutationOutcome::Committed | MutationOutcome::StaleConfirmation => {
                info!(task_id = %self.task_id, "assignment committed");
                self.close(WorkflowClosure::Committed);
            }
            MutationOutcome::RolledBack(failure) | MutationOutcome::StaleFailure(failure) => {
                self.alert = Some(format!("Failed to assign task: {}", failure.reason));
                self.enter(WorkflowState::AssignmentDetails);
            }
            MutationOutcome::Cancelled => {
                self.alert = Some("Assignment was superseded by a newer change".to_owned());
                self.enter(WorkflowState::AssignmentDetails);
            }
            MutationOutcome::DeadLettered => self.close(WorkflowClosure::Cancelled),
        }
        Ok(())
    }

    /// Returns a submitting dialog to the details step after the pending
    /// write could not be settled at all.
    pub(crate) fn abort_submission(&mut self, reason: &impl std::fmt::Display) {
        if self.state == WorkflowState::Submitting {
            warn!(task_id = %self.task_id, %reason, "assignment could not be settled");
            self.alert = Some(format!("Failed to assign task: {reason}"));
            self.enter(WorkflowState::AssignmentDetails);
        }
    }

    /// Dismisses the dialog without assigning. Has no effect once closed.
    pub fn cancel(&mut self) {
        if self.is_open() {
            debug!(task_id = %self.task_id, "assignment cancelled");
            self.close(WorkflowClosure::Cancelled);
        }
    }

    fn build_assignment(&self, clock: &impl Clock) -> WorkflowResult<Assignment> {
        let employee_id = self
            .form
            .employee_id
            .clone()
            .ok_or(AssignmentWorkflowError::NoUserSelected)?;
        let schedule = match self.form.assignment_type {
            AssignmentType::OneTime => AssignmentSchedule::OneTime {
                due_date: self
                    .form
                    .due_date
                    .ok_or(AssignmentWorkflowError::MissingDueDate)?,
            },
            AssignmentType::Recurring => {
                if self.form.monthly_due_day.trim().is_empty() {
                    return Err(AssignmentWorkflowError::MissingMonthlyDueDay);
                }
                AssignmentSchedule::Recurring {
                    monthly_due_day: MonthlyDueDay::parse(&self.form.monthly_due_day)?,
                }
            }
        };
        check_length("notes", &self.form.notes, self.config.max_notes_length)?;
        Assignment::new(employee_id, schedule, self.form.notes.clone(), clock)
            .map_err(AssignmentWorkflowError::from)
    }

    fn expect_state(
        &mut self,
        expected: WorkflowState,
        action: WorkflowAction,
    ) -> WorkflowResult<()> {
        if self.state == expected {
            return Ok(());
        }
        self.reject(AssignmentWorkflowError::InvalidTransition {
            state: self.state,
            action,
        })
    }

    fn reject<T>(&mut self, err: AssignmentWorkflowError) -> WorkflowResult<T> {
        debug!(
            task_id = %self.task_id,
            state = %self.state,
            error = %err,
            "assignment action rejected"
        );
        self.validation_message = Some(err.to_string());
        Err(err)
    }

    fn enter(&mut self, state: WorkflowState) {
        self.state = state;
        self.validation_message = None;
    }

    fn close(&mut self, closure: WorkflowClosure) {
        self.form = AssignmentForm::default();
        self.validation_message = None;
        self.alert = None;
        self.state = WorkflowState::Closed(closure);
    }
}
