//! Reporting task board synchronisation.
//!
//! The board shows report-disclosure tasks in status columns. Drag-and-drop
//! re-classification, priority edits, content edits, and assignments are
//! applied to the local [`services::TaskStore`] immediately and reconciled
//! with the remote API afterwards, rolling back on failure. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
