//! Business logic services.

#![allow(missing_docs)]

pub mod announcement;
pub mod assignment;
pub mod auth;
pub mod comment;
pub mod course;
pub mod notification;
pub mod submission;
pub mod user;

pub use announcement::{AnnouncementService, CreateAnnouncementInput, UpdateAnnouncementInput};
pub use assignment::{
    AddMaterialInput, AssignmentService, CreateAssignmentInput, UpdateAssignmentInput,
};
pub use auth::{AuthResponse, AuthService, LoginInput, RegisterInput, UserSummary};
pub use comment::{CommentService, CreateCommentInput};
pub use course::{
    CourseService, CreateCourseInput, CreateFolderInput, EnrollOutcome, FolderContents,
    UpdateCourseInput, UpdateFolderInput, Workspace,
};
pub use notification::{CreateNotificationInput, NotificationService};
pub use submission::{
    AddSubmissionFileInput, GradeInput, SubmissionService, SubmitInput, SubmitOutcome,
    UpdateSubmissionInput,
};
pub use user::{CreateUserInput, UpdateUserInput, UserService};
