//! Create assignment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Assignment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Assignment::CourseId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignment::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Assignment::Description).text())
                    .col(ColumnDef::new(Assignment::DueDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Assignment::PointsPossible).double())
                    .col(
                        ColumnDef::new(Assignment::AssignmentType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Assignment::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignment_course")
                            .from(Assignment::Table, Assignment::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assignment_course_id")
                    .table(Assignment::Table)
                    .col(Assignment::CourseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Assignment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Assignment {
    Table,
    Id,
    CourseId,
    Title,
    Description,
    DueDate,
    PointsPossible,
    AssignmentType,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Course {
    Table,
    Id,
}
