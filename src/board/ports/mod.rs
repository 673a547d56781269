//! Port contracts for the task board.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod remote;

pub use remote::{RemoteError, RemoteResult, TaskBoardApi};

#[cfg(test)]
pub use remote::MockTaskBoardApi;
