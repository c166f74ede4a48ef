//! # Homeroom Core
//!
//! Core types and utilities shared across the Homeroom workspace.
//!
//! This crate is deliberately free of web-framework and database
//! dependencies so the CLI and the server can both build on it:
//!
//! - [`form`]: a generic key-indexed form state manager (values,
//!   validators, required flags, whole-form validity)
//! - [`pagination`]: pagination parameters and response metadata
//! - [`serde`]: custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use homeroom_core::form::{FieldSpec, FormState};
//! use homeroom_core::pagination::PaginationParams;
//!
//! let mut form = FormState::new([("email", FieldSpec::required())]);
//! form.set("email", "teacher@school.ac.th");
//! assert!(form.form_ok());
//!
//! let params = PaginationParams::default();
//! let limit = params.limit();
//! ```

pub mod form;
pub mod pagination;
pub mod serde;

// Re-export commonly used types at crate root
pub use form::{FieldSpec, FieldValue, FormState};
pub use pagination::{PaginationMeta, PaginationParams};
