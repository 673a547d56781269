//! Step definitions for task board scenarios.

pub mod then;
pub mod when;
pub mod world;
