//! Create submission table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Submission::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submission::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submission::AssignmentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submission::StudentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submission::Text).text())
                    .col(ColumnDef::new(Submission::Grade).double())
                    .col(ColumnDef::new(Submission::Feedback).text())
                    .col(ColumnDef::new(Submission::Status).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Submission::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Submission::GradedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submission_assignment")
                            .from(Submission::Table, Submission::AssignmentId)
                            .to(Assignment::Table, Assignment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submission_student")
                            .from(Submission::Table, Submission::StudentId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique pair: one submission per (assignment, student).
        // Re-submitting overwrites the existing row.
        manager
            .create_index(
                Index::create()
                    .name("idx_submission_assignment_student_unique")
                    .table(Submission::Table)
                    .col(Submission::AssignmentId)
                    .col(Submission::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_student_id")
                    .table(Submission::Table)
                    .col(Submission::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Submission::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Submission {
    Table,
    Id,
    AssignmentId,
    StudentId,
    Text,
    Grade,
    Feedback,
    Status,
    SubmittedAt,
    GradedAt,
}

#[derive(Iden)]
enum Assignment {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
