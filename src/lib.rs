//! ESG reporting task board synchronisation engine.
//!
//! This crate keeps a kanban board of report-disclosure tasks consistent
//! with a remote reporting API. Board edits are applied to local state
//! immediately and reconciled with the server afterwards: confirmed writes
//! stay, rejected writes are rolled back field by field.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure task, user, and assignment values
//! - **Ports**: The remote API contract
//! - **Adapters**: Concrete implementations of ports
//! - **Services**: Task store, optimistic mutator, board controller,
//!   assignment workflow, and dialog coordination
//!
//! # Modules
//!
//! - [`board`]: Task board domain, ports, adapters, and services
//! - [`telemetry`]: Tracing subscriber setup

pub mod board;
pub mod telemetry;
