//! Create course table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Course::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Course::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Course::Code).string_len(16).not_null())
                    .col(ColumnDef::new(Course::Description).text())
                    .col(ColumnDef::new(Course::Section).string_len(64))
                    .col(ColumnDef::new(Course::Subject).string_len(128))
                    .col(ColumnDef::new(Course::Room).string_len(64))
                    .col(ColumnDef::new(Course::TeacherId).string_len(32).not_null())
                    .col(ColumnDef::new(Course::FolderId).string_len(32))
                    .col(
                        ColumnDef::new(Course::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Course::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Course::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_teacher")
                            .from(Course::Table, Course::TeacherId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_folder")
                            .from(Course::Table, Course::FolderId)
                            .to(Folder::Table, Folder::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: join codes collide only at generation time; the
        // constraint backs the retry loop.
        manager
            .create_index(
                Index::create()
                    .name("idx_course_code_unique")
                    .table(Course::Table)
                    .col(Course::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_teacher_id")
                    .table(Course::Table)
                    .col(Course::TeacherId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Course::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Course {
    Table,
    Id,
    Name,
    Code,
    Description,
    Section,
    Subject,
    Room,
    TeacherId,
    FolderId,
    IsArchived,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Folder {
    Table,
    Id,
}
