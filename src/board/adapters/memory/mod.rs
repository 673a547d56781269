//! In-memory adapters for board tests and local sessions.

mod remote;

pub use remote::{BoardFixture, InMemoryTaskBoardApi};
