//! Record registries — one component per record type
//!
//! Each registry owns its record map, its id allocator, and its transition
//! journal. Every operation is one indivisible `&mut self` step: all checks
//! run before any field is touched, so a failure mutates nothing. No
//! registry operation blocks on another registry.

pub mod project;
pub mod construct;
pub mod experiment;

pub use project::{Project, ProjectRegistry, ProjectStatus, MAX_COLLABORATORS};
pub use construct::{ConstructRegistry, ConstructToken};
pub use experiment::{Experiment, ExperimentRegistry, ExperimentStatus};
