//! Create enrollment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enrollment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Enrollment::CourseId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollment::StudentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Enrollment::Status).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Enrollment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Enrollment::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_course")
                            .from(Enrollment::Table, Enrollment::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_student")
                            .from(Enrollment::Table, Enrollment::StudentId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique pair: one enrollment per (course, student). Re-enrolling
        // becomes a status update, never a second row.
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_course_student_unique")
                    .table(Enrollment::Table)
                    .col(Enrollment::CourseId)
                    .col(Enrollment::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_student_id")
                    .table(Enrollment::Table)
                    .col(Enrollment::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Enrollment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Enrollment {
    Table,
    Id,
    CourseId,
    StudentId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Course {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
