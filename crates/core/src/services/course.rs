//! Course service.
//!
//! Course CRUD, the folder tree, and enrollment. Join codes are generated
//! here; the unique constraint on the code column arbitrates collisions.

use std::sync::Arc;

use classroom_common::{AppError, AppResult, CourseStorage, IdGenerator};
use classroom_db::{
    entities::{course, enrollment, enrollment::EnrollmentStatus, folder, user},
    repositories::{CourseRepository, EnrollmentRepository, FolderRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// How many generated codes to try before giving up. Collisions are rare
/// (36^6 keyspace), so repeated conflicts indicate something is wrong.
const MAX_CODE_ATTEMPTS: u32 = 5;

/// Course service for business logic.
#[derive(Clone)]
pub struct CourseService {
    course_repo: CourseRepository,
    folder_repo: FolderRepository,
    enrollment_repo: EnrollmentRepository,
    user_repo: UserRepository,
    storage: Arc<dyn CourseStorage>,
    id_gen: IdGenerator,
}

/// Input for creating a course.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(max = 4096))]
    pub description: Option<String>,

    #[validate(length(max = 64))]
    pub section: Option<String>,

    #[validate(length(max = 128))]
    pub subject: Option<String>,

    #[validate(length(max = 64))]
    pub room: Option<String>,

    pub teacher_id: String,

    pub folder_id: Option<String>,

    /// Explicit join code. When absent one is generated.
    #[validate(length(min = 6, max = 16))]
    pub code: Option<String>,
}

/// Input for updating a course.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCourseInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    #[validate(length(max = 4096))]
    pub description: Option<String>,

    #[validate(length(max = 64))]
    pub section: Option<String>,

    #[validate(length(max = 128))]
    pub subject: Option<String>,

    #[validate(length(max = 64))]
    pub room: Option<String>,

    pub folder_id: Option<Option<String>>,

    pub is_archived: Option<bool>,
}

/// Input for creating a folder.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFolderInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    pub owner_id: String,

    pub parent_id: Option<String>,
}

/// Input for updating a folder.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFolderInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    pub parent_id: Option<Option<String>>,
}

/// A user's workspace: folders first, then courses.
#[derive(Debug)]
pub struct Workspace {
    pub folders: Vec<folder::Model>,
    pub courses: Vec<course::Model>,
}

/// Direct contents of a folder.
#[derive(Debug)]
pub struct FolderContents {
    pub folders: Vec<folder::Model>,
    pub courses: Vec<course::Model>,
}

/// Result of an enroll/join operation.
#[derive(Debug)]
pub struct EnrollOutcome {
    pub enrollment: enrollment::Model,
    /// True when a new enrollment row was created, false when an existing
    /// one had its status updated.
    pub created: bool,
}

impl CourseService {
    /// Create a new course service.
    #[must_use]
    pub fn new(
        course_repo: CourseRepository,
        folder_repo: FolderRepository,
        enrollment_repo: EnrollmentRepository,
        user_repo: UserRepository,
        storage: Arc<dyn CourseStorage>,
    ) -> Self {
        Self {
            course_repo,
            folder_repo,
            enrollment_repo,
            user_repo,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a course.
    ///
    /// When no code is supplied a 6-char one is generated; a collision
    /// with an existing course retries with a fresh code up to
    /// `MAX_CODE_ATTEMPTS` times. The per-course folder tree is created as
    /// a spawned side effect; its failure never fails the request.
    pub async fn create(&self, input: CreateCourseInput) -> AppResult<course::Model> {
        input.validate()?;

        // The owning teacher must exist.
        let teacher = self.user_repo.get_by_id(&input.teacher_id).await?;

        let supplied_code = input.code.clone();
        let mut attempts = 0;

        let course = loop {
            attempts += 1;
            let code = supplied_code
                .clone()
                .unwrap_or_else(|| self.id_gen.generate_course_code());

            let model = course::ActiveModel {
                id: Set(self.id_gen.generate()),
                name: Set(input.name.clone()),
                code: Set(code),
                description: Set(input.description.clone()),
                section: Set(input.section.clone()),
                subject: Set(input.subject.clone()),
                room: Set(input.room.clone()),
                teacher_id: Set(teacher.id.clone()),
                folder_id: Set(input.folder_id.clone()),
                is_archived: Set(false),
                created_at: Set(chrono::Utc::now().into()),
                ..Default::default()
            };

            match self.course_repo.create(model).await {
                Ok(course) => break course,
                Err(AppError::Conflict(_))
                    if supplied_code.is_none() && attempts < MAX_CODE_ATTEMPTS =>
                {
                    tracing::debug!(attempts, "Join code collision, regenerating");
                }
                Err(AppError::Conflict(_)) if supplied_code.is_some() => {
                    return Err(AppError::Conflict("Course code already in use".to_string()));
                }
                Err(e) => return Err(e),
            }
        };

        self.spawn_folder_creation(&course);

        Ok(course)
    }

    /// Best-effort creation of the course folder tree on disk.
    fn spawn_folder_creation(&self, course: &course::Model) {
        let storage = Arc::clone(&self.storage);
        let course_id = course.id.clone();
        let course_name = course.name.clone();

        tokio::spawn(async move {
            if let Err(e) = storage.create_course_folder(&course_id, &course_name).await {
                tracing::warn!(course_id = %course_id, error = %e, "Course folder creation failed");
            }
        });
    }

    /// Get a course by ID.
    pub async fn get(&self, id: &str) -> AppResult<course::Model> {
        self.course_repo.get_by_id(id).await
    }

    /// List all courses.
    pub async fn list(&self) -> AppResult<Vec<course::Model>> {
        self.course_repo.find_all().await
    }

    /// Update a course.
    pub async fn update(&self, id: &str, input: UpdateCourseInput) -> AppResult<course::Model> {
        input.validate()?;

        let course = self.course_repo.get_by_id(id).await?;
        let mut active: course::ActiveModel = course.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(section) = input.section {
            active.section = Set(Some(section));
        }
        if let Some(subject) = input.subject {
            active.subject = Set(Some(subject));
        }
        if let Some(room) = input.room {
            active.room = Set(Some(room));
        }
        if let Some(folder_id) = input.folder_id {
            active.folder_id = Set(folder_id);
        }
        if let Some(is_archived) = input.is_archived {
            active.is_archived = Set(is_archived);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.course_repo.update(active).await
    }

    /// Delete a course. Its on-disk folder tree is removed as a spawned
    /// side effect; that failure never fails the request.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.course_repo.delete(id).await?;
        self.spawn_folder_deletion(id);
        Ok(())
    }

    /// Best-effort removal of the course folder tree on disk.
    fn spawn_folder_deletion(&self, course_id: &str) {
        let storage = Arc::clone(&self.storage);
        let course_id = course_id.to_string();

        tokio::spawn(async move {
            if let Err(e) = storage.delete_course_folder(&course_id).await {
                tracing::warn!(course_id = %course_id, error = %e, "Course folder deletion failed");
            }
        });
    }

    /// Enroll a student in a course.
    ///
    /// The (course, student) unique pair arbitrates: a fresh insert wins,
    /// and a conflict means the student is already enrolled, in which case
    /// the existing row's status is updated instead.
    pub async fn enroll(
        &self,
        course_id: &str,
        student_id: &str,
        status: Option<EnrollmentStatus>,
    ) -> AppResult<EnrollOutcome> {
        let course = self.course_repo.get_by_id(course_id).await?;
        let student = self.user_repo.get_by_id(student_id).await?;
        let status = status.unwrap_or_default();

        let model = enrollment::ActiveModel {
            id: Set(self.id_gen.generate()),
            course_id: Set(course.id.clone()),
            student_id: Set(student.id.clone()),
            status: Set(status),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        match self.enrollment_repo.create(model).await {
            Ok(enrollment) => Ok(EnrollOutcome {
                enrollment,
                created: true,
            }),
            Err(AppError::Conflict(_)) => {
                let existing = self
                    .enrollment_repo
                    .find_by_pair(&course.id, &student.id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Database("Enrollment conflict with no existing row".to_string())
                    })?;

                let mut active: enrollment::ActiveModel = existing.into();
                active.status = Set(status);
                active.updated_at = Set(Some(chrono::Utc::now().into()));

                let enrollment = self.enrollment_repo.update(active).await?;
                Ok(EnrollOutcome {
                    enrollment,
                    created: false,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Join a course by its code, with enroll-or-update semantics.
    pub async fn join_by_code(
        &self,
        code: &str,
        student_id: &str,
        status: Option<EnrollmentStatus>,
    ) -> AppResult<(course::Model, EnrollOutcome)> {
        let course = self
            .course_repo
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::CourseNotFound(format!("code {code}")))?;

        let outcome = self.enroll(&course.id, student_id, status).await?;
        Ok((course, outcome))
    }

    /// A teacher's workspace: their folders, then their courses.
    pub async fn workspace_for_teacher(&self, teacher_id: &str) -> AppResult<Workspace> {
        let folders = self.folder_repo.find_by_owner(teacher_id).await?;
        let courses = self.course_repo.find_by_teacher(teacher_id).await?;
        Ok(Workspace { folders, courses })
    }

    /// A student's workspace: their folders, then their enrolled courses.
    pub async fn workspace_for_student(&self, student_id: &str) -> AppResult<Workspace> {
        let folders = self.folder_repo.find_by_owner(student_id).await?;
        let courses = self.course_repo.find_by_student(student_id).await?;
        Ok(Workspace { folders, courses })
    }

    /// Students of a course.
    pub async fn students(&self, course_id: &str) -> AppResult<Vec<user::Model>> {
        self.course_repo.get_by_id(course_id).await?;
        self.course_repo.find_students(course_id).await
    }

    /// Enrollments of a student.
    pub async fn enrollments_for_student(
        &self,
        student_id: &str,
    ) -> AppResult<Vec<enrollment::Model>> {
        self.enrollment_repo.find_by_student(student_id).await
    }

    /// Create a folder.
    pub async fn create_folder(&self, input: CreateFolderInput) -> AppResult<folder::Model> {
        input.validate()?;

        let owner = self.user_repo.get_by_id(&input.owner_id).await?;

        if let Some(parent_id) = &input.parent_id {
            self.folder_repo.get_by_id(parent_id).await?;
        }

        let model = folder::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            owner_id: Set(owner.id),
            parent_id: Set(input.parent_id),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        self.folder_repo.create(model).await
    }

    /// Get a folder by ID.
    pub async fn get_folder(&self, id: &str) -> AppResult<folder::Model> {
        self.folder_repo.get_by_id(id).await
    }

    /// List folders owned by a user.
    pub async fn folders_for_owner(&self, owner_id: &str) -> AppResult<Vec<folder::Model>> {
        self.folder_repo.find_by_owner(owner_id).await
    }

    /// Update a folder.
    pub async fn update_folder(&self, id: &str, input: UpdateFolderInput) -> AppResult<folder::Model> {
        input.validate()?;

        let folder = self.folder_repo.get_by_id(id).await?;
        let mut active: folder::ActiveModel = folder.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(parent_id) = input.parent_id {
            active.parent_id = Set(parent_id);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.folder_repo.update(active).await
    }

    /// Delete a folder.
    pub async fn delete_folder(&self, id: &str) -> AppResult<()> {
        self.folder_repo.delete(id).await
    }

    /// Direct contents of a folder: child folders first, then courses.
    pub async fn folder_contents(&self, id: &str) -> AppResult<FolderContents> {
        self.folder_repo.get_by_id(id).await?;

        let folders = self.folder_repo.find_children(id).await?;
        let courses = self.course_repo.find_by_folder(id).await?;
        Ok(FolderContents { folders, courses })
    }
}
