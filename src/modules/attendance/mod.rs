pub mod controller;
pub mod model;
pub mod router;
pub mod service;
pub mod summary;

pub use model::*;
pub use router::init_attendance_router;
