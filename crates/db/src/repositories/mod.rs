//! Database repositories.
//!
//! One repository per entity, each wrapping the shared connection pool.
//! Inserts surface unique-constraint violations as [`AppError::Conflict`]
//! so services can react to the constraint instead of a preceding read.

use classroom_common::AppError;
use sea_orm::{DbErr, SqlErr};

pub mod announcement;
pub mod assignment;
pub mod comment;
pub mod course;
pub mod enrollment;
pub mod folder;
pub mod notification;
pub mod submission;
pub mod user;

pub use announcement::AnnouncementRepository;
pub use assignment::AssignmentRepository;
pub use comment::CommentRepository;
pub use course::CourseRepository;
pub use enrollment::EnrollmentRepository;
pub use folder::FolderRepository;
pub use notification::NotificationRepository;
pub use submission::SubmissionRepository;
pub use user::UserRepository;

/// Map an insert error, turning unique-constraint violations into Conflict.
pub(crate) fn map_insert_err(e: DbErr, what: &str) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict(format!("{what} already exists"))
        }
        _ => AppError::Database(e.to_string()),
    }
}

/// Map an update error. A row deleted out from under an update surfaces
/// as `RecordNotUpdated`, which callers see as NotFound.
pub(crate) fn map_update_err(e: DbErr, what: &str) -> AppError {
    match e {
        DbErr::RecordNotUpdated => AppError::NotFound(format!("{what} not found")),
        _ => AppError::Database(e.to_string()),
    }
}
