//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_folder_table;
mod m20250101_000003_create_course_table;
mod m20250101_000004_create_enrollment_table;
mod m20250101_000005_create_assignment_table;
mod m20250101_000006_create_assignment_material_table;
mod m20250101_000007_create_submission_table;
mod m20250101_000008_create_submission_file_table;
mod m20250101_000009_create_announcement_table;
mod m20250101_000010_create_comment_table;
mod m20250101_000011_create_notification_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_folder_table::Migration),
            Box::new(m20250101_000003_create_course_table::Migration),
            Box::new(m20250101_000004_create_enrollment_table::Migration),
            Box::new(m20250101_000005_create_assignment_table::Migration),
            Box::new(m20250101_000006_create_assignment_material_table::Migration),
            Box::new(m20250101_000007_create_submission_table::Migration),
            Box::new(m20250101_000008_create_submission_file_table::Migration),
            Box::new(m20250101_000009_create_announcement_table::Migration),
            Box::new(m20250101_000010_create_comment_table::Migration),
            Box::new(m20250101_000011_create_notification_table::Migration),
        ]
    }
}
