//! Attendance data models and DTOs.
//!
//! Re-exported from the `homeroom-models` crate; the pure reducers over
//! these types live in [`crate::modules::attendance::summary`].

pub use homeroom_models::attendance::*;
