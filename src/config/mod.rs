//! Configuration modules for the Homeroom API.
//!
//! Each submodule loads one aspect of configuration from environment
//! variables via a `from_env()` constructor:
//!
//! - [`cors`]: allowed CORS origins
//! - [`attendance`]: attendance policy knobs (monthly fill mode)
//!
//! Database pool initialization lives in the `homeroom-db` crate.

pub mod attendance;
pub mod cors;
