//! Classroom data models and DTOs.
//!
//! Re-exported from the `homeroom-models` crate.

pub use homeroom_models::classrooms::*;
