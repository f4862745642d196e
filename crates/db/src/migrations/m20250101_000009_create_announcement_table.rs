//! Create announcement table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Announcement::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Announcement::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Announcement::CourseId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Announcement::TeacherId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Announcement::Title)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Announcement::Content).text().not_null())
                    .col(
                        ColumnDef::new(Announcement::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Announcement::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_announcement_course")
                            .from(Announcement::Table, Announcement::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_announcement_teacher")
                            .from(Announcement::Table, Announcement::TeacherId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_announcement_course_id")
                    .table(Announcement::Table)
                    .col(Announcement::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_announcement_teacher_id")
                    .table(Announcement::Table)
                    .col(Announcement::TeacherId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Announcement::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Announcement {
    Table,
    Id,
    CourseId,
    TeacherId,
    Title,
    Content,
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
