//! Database entities.

pub mod announcement;
pub mod assignment;
pub mod assignment_material;
pub mod comment;
pub mod course;
pub mod enrollment;
pub mod folder;
pub mod notification;
pub mod submission;
pub mod submission_file;
pub mod user;

pub use announcement::Entity as Announcement;
pub use assignment::Entity as Assignment;
pub use assignment_material::Entity as AssignmentMaterial;
pub use comment::Entity as Comment;
pub use course::Entity as Course;
pub use enrollment::Entity as Enrollment;
pub use folder::Entity as Folder;
pub use notification::Entity as Notification;
pub use submission::Entity as Submission;
pub use submission_file::Entity as SubmissionFile;
pub use user::Entity as User;
