//! Common utilities and shared types for classroom-rs.
//!
//! This crate provides foundational components used across all classroom-rs
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based identifiers and course codes via [`IdGenerator`]
//! - **Tokens**: Bearer token issuance and verification via [`TokenIssuer`]
//! - **Storage**: Per-course folder creation on the local filesystem
//!
//! # Example
//!
//! ```no_run
//! use classroom_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod storage;
pub mod token;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use storage::{CourseStorage, LocalCourseStorage};
pub use token::{Claims, TokenIssuer};
