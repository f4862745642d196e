//! Core business logic for classroom-rs.

pub mod services;

pub use services::*;
