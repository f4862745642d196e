//! Service integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test service_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `classroom_test`)
//!   `TEST_DB_PASSWORD` (default: `classroom_test`)
//!   `TEST_DB_NAME` (default: `classroom_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use classroom_common::{CourseStorage, LocalCourseStorage};
use classroom_core::{
    AssignmentService, CourseService, CreateAssignmentInput, CreateCourseInput, CreateUserInput,
    SubmissionService, SubmitInput, UserService,
};
use classroom_db::entities::{enrollment::EnrollmentStatus, user::UserRole};
use classroom_db::repositories::{
    AssignmentRepository, CourseRepository, EnrollmentRepository, FolderRepository,
    SubmissionRepository, UserRepository,
};
use classroom_db::test_utils::TestDatabase;
use sea_orm::DatabaseConnection;

struct Services {
    users: UserService,
    courses: CourseService,
    assignments: AssignmentService,
    submissions: SubmissionService,
}

fn build_services(db: &Arc<DatabaseConnection>) -> Services {
    let db = Arc::clone(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let course_repo = CourseRepository::new(Arc::clone(&db));
    let storage: Arc<dyn CourseStorage> = Arc::new(LocalCourseStorage::new(
        std::env::temp_dir().join("classroom-service-integration"),
    ));

    Services {
        users: UserService::new(user_repo.clone()),
        courses: CourseService::new(
            course_repo.clone(),
            FolderRepository::new(Arc::clone(&db)),
            EnrollmentRepository::new(Arc::clone(&db)),
            user_repo.clone(),
            storage,
        ),
        assignments: AssignmentService::new(
            AssignmentRepository::new(Arc::clone(&db)),
            course_repo,
        ),
        submissions: SubmissionService::new(
            SubmissionRepository::new(Arc::clone(&db)),
            AssignmentRepository::new(Arc::clone(&db)),
            user_repo,
        ),
    }
}

async fn create_user(services: &Services, email: &str, role: UserRole) -> String {
    services
        .users
        .create(CreateUserInput {
            email: email.to_string(),
            password: "correct horse battery".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role,
        })
        .await
        .unwrap()
        .id
}

async fn create_course(services: &Services, teacher_id: &str) -> String {
    services
        .courses
        .create(CreateCourseInput {
            name: "Math 101".to_string(),
            description: None,
            section: None,
            subject: None,
            room: None,
            teacher_id: teacher_id.to_string(),
            folder_id: None,
            code: None,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_resubmit_overwrites_existing_submission() {
    let db = TestDatabase::create_unique().await.expect("Failed to create");
    classroom_db::migrate(db.connection()).await.expect("Migration failed");

    let services = build_services(&db.conn);

    let teacher = create_user(&services, "teacher@example.com", UserRole::Teacher).await;
    let student = create_user(&services, "student@example.com", UserRole::Student).await;
    let course = create_course(&services, &teacher).await;

    let assignment = services
        .assignments
        .create(CreateAssignmentInput {
            course_id: course,
            title: "Problem Set 1".to_string(),
            description: None,
            due_date: None,
            points_possible: Some(100.0),
            assignment_type: None,
        })
        .await
        .unwrap();

    let first = services
        .submissions
        .submit(SubmitInput {
            assignment_id: assignment.id.clone(),
            student_id: student.clone(),
            text: Some("First draft".to_string()),
            status: None,
        })
        .await
        .unwrap();
    assert!(first.created);

    let second = services
        .submissions
        .submit(SubmitInput {
            assignment_id: assignment.id.clone(),
            student_id: student.clone(),
            text: Some("Final answer".to_string()),
            status: None,
        })
        .await
        .unwrap();

    assert!(!second.created);
    assert_eq!(second.submission.id, first.submission.id);
    assert_eq!(second.submission.text.as_deref(), Some("Final answer"));
    assert!(second.submission.submitted_at >= first.submission.submitted_at);

    // Still exactly one row for the (assignment, student) pair.
    let all = services
        .submissions
        .list_for_assignment(&assignment.id)
        .await
        .unwrap();
    assert_eq!(all.len(), 1);

    db.drop_database().await.expect("Failed to drop");
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_reenroll_updates_existing_enrollment_status() {
    let db = TestDatabase::create_unique().await.expect("Failed to create");
    classroom_db::migrate(db.connection()).await.expect("Migration failed");

    let services = build_services(&db.conn);

    let teacher = create_user(&services, "teacher@example.com", UserRole::Teacher).await;
    let student = create_user(&services, "student@example.com", UserRole::Student).await;
    let course = create_course(&services, &teacher).await;

    let first = services.courses.enroll(&course, &student, None).await.unwrap();
    assert!(first.created);
    assert_eq!(first.enrollment.status, EnrollmentStatus::Active);

    let second = services
        .courses
        .enroll(&course, &student, Some(EnrollmentStatus::Inactive))
        .await
        .unwrap();

    assert!(!second.created);
    assert_eq!(second.enrollment.id, first.enrollment.id);
    assert_eq!(second.enrollment.status, EnrollmentStatus::Inactive);
    assert!(second.enrollment.updated_at.is_some());

    // Still a single enrollment row for the student.
    let enrollments = services
        .courses
        .enrollments_for_student(&student)
        .await
        .unwrap();
    assert_eq!(enrollments.len(), 1);

    db.drop_database().await.expect("Failed to drop");
}
