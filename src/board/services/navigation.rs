//! Dialog navigation stack for the task detail and assignment dialogs.

use crate::board::domain::TaskId;
use thiserror::Error;

/// Maximum number of stacked dialogs: a detail view and the assignment
/// dialog opened from it.
pub const MAX_DIALOG_DEPTH: usize = 2;

/// A dialog that can be shown over the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    /// Read-only drill-in for a task.
    TaskDetail(TaskId),
    /// Assignment dialog for a task.
    Assignment(TaskId),
}

impl Dialog {
    /// Returns the task the dialog belongs to.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        match self {
            Self::TaskDetail(task_id) | Self::Assignment(task_id) => task_id,
        }
    }
}

/// Errors raised when a dialog cannot be opened.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavigationError {
    /// The stack already holds [`MAX_DIALOG_DEPTH`] dialogs.
    #[error("dialog stack is full")]
    StackFull,

    /// The dialog cannot be opened over the current top dialog.
    #[error("cannot open {opened:?} over {top:?}")]
    InvalidNesting {
        /// Dialog currently on top.
        top: Dialog,
        /// Dialog that was requested.
        opened: Dialog,
    },
}

/// Stack of open dialogs; only the top one is visible.
///
/// A detail view may only be opened on an empty stack. An assignment
/// dialog may be opened on an empty stack or over the detail view of the
/// same task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationStack {
    dialogs: Vec<Dialog>,
}

impl NavigationStack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dialogs: Vec::new(),
        }
    }

    /// Opens a dialog on top of the stack.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::StackFull`] at maximum depth, or
    /// [`NavigationError::InvalidNesting`] when the dialog may not sit on the
    /// current top.
    pub fn push(&mut self, dialog: Dialog) -> Result<(), NavigationError> {
        if self.dialogs.len() >= MAX_DIALOG_DEPTH {
            return Err(NavigationError::StackFull);
        }
        if let Some(top) = self.dialogs.last() {
            let allowed = matches!(
                (top, &dialog),
                (Dialog::TaskDetail(detail), Dialog::Assignment(assigned)) if detail == assigned
            );
            if !allowed {
                return Err(NavigationError::InvalidNesting {
                    top: top.clone(),
                    opened: dialog,
                });
            }
        }
        self.dialogs.push(dialog);
        Ok(())
    }

    /// Closes the top dialog and returns it.
    pub fn pop(&mut self) -> Option<Dialog> {
        self.dialogs.pop()
    }

    /// Closes every dialog.
    pub fn clear(&mut self) {
        self.dialogs.clear();
    }

    /// Returns the visible dialog.
    #[must_use]
    pub fn top(&self) -> Option<&Dialog> {
        self.dialogs.last()
    }

    /// Returns the number of open dialogs.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.dialogs.len()
    }

    /// Returns `true` when no dialog is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }
}
