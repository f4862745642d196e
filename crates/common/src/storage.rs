//! Per-course folder storage.
//!
//! Each course gets a folder tree on disk (`{course_id}_{name}` with
//! `Assignments`, `Materials` and `Submissions` subdirectories). Folder
//! creation is a best-effort side effect of course creation; callers spawn
//! it and log failures rather than failing the request.

use std::path::PathBuf;

use crate::{AppError, AppResult};

/// Subdirectories created inside every course folder.
pub const COURSE_SUBDIRS: [&str; 3] = ["Assignments", "Materials", "Submissions"];

/// Filesystem collaborator for course folder trees.
#[async_trait::async_trait]
pub trait CourseStorage: Send + Sync {
    /// Create the folder tree for a course and return its path.
    ///
    /// Idempotent: re-creating an existing tree succeeds.
    async fn create_course_folder(&self, course_id: &str, course_name: &str)
    -> AppResult<PathBuf>;

    /// Locate an existing course folder by course id.
    async fn find_course_folder(&self, course_id: &str) -> AppResult<Option<PathBuf>>;

    /// Remove a course folder tree if it exists.
    async fn delete_course_folder(&self, course_id: &str) -> AppResult<()>;
}

/// Local filesystem implementation of [`CourseStorage`].
pub struct LocalCourseStorage {
    base_path: PathBuf,
}

impl LocalCourseStorage {
    /// Create a storage backend rooted at `base_path`.
    #[must_use]
    pub const fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Folder name for a course: `{course_id}_{sanitized_name}`.
    fn folder_name(course_id: &str, course_name: &str) -> String {
        format!("{}_{}", course_id, sanitize_folder_name(course_name))
    }
}

#[async_trait::async_trait]
impl CourseStorage for LocalCourseStorage {
    async fn create_course_folder(
        &self,
        course_id: &str,
        course_name: &str,
    ) -> AppResult<PathBuf> {
        let course_dir = self.base_path.join(Self::folder_name(course_id, course_name));

        for subdir in COURSE_SUBDIRS {
            tokio::fs::create_dir_all(course_dir.join(subdir))
                .await
                .map_err(|e| {
                    AppError::Storage(format!(
                        "Failed to create course folder {}: {e}",
                        course_dir.display()
                    ))
                })?;
        }

        Ok(course_dir)
    }

    async fn find_course_folder(&self, course_id: &str) -> AppResult<Option<PathBuf>> {
        let prefix = format!("{course_id}_");

        let mut entries = match tokio::fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read storage directory {}: {e}",
                    self.base_path.display()
                )));
            }
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to scan storage directory: {e}")))?
        {
            if entry.file_name().to_string_lossy().starts_with(&prefix) {
                return Ok(Some(entry.path()));
            }
        }

        Ok(None)
    }

    async fn delete_course_folder(&self, course_id: &str) -> AppResult<()> {
        if let Some(path) = self.find_course_folder(course_id).await? {
            tokio::fs::remove_dir_all(&path).await.map_err(|e| {
                AppError::Storage(format!(
                    "Failed to delete course folder {}: {e}",
                    path.display()
                ))
            })?;
        }
        Ok(())
    }
}

/// Replace characters that are invalid in folder names with underscores.
#[must_use]
pub fn sanitize_folder_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}
