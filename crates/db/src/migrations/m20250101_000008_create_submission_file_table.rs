//! Create submission file table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubmissionFile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubmissionFile::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubmissionFile::SubmissionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubmissionFile::FileName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubmissionFile::FileType).string_len(128))
                    .col(
                        ColumnDef::new(SubmissionFile::FileUrl)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubmissionFile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submission_file_submission")
                            .from(SubmissionFile::Table, SubmissionFile::SubmissionId)
                            .to(Submission::Table, Submission::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_file_submission_id")
                    .table(SubmissionFile::Table)
                    .col(SubmissionFile::SubmissionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubmissionFile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SubmissionFile {
    Table,
    Id,
    SubmissionId,
    FileName,
    FileType,
    FileUrl,
    CreatedAt,
}

#[derive(Iden)]
enum Submission {
    Table,
    Id,
}
