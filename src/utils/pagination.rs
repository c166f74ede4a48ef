//! Pagination utilities.
//!
//! Re-exported from the `homeroom-core` crate so handlers can keep the
//! familiar `crate::utils::pagination` path.

pub use homeroom_core::pagination::*;
