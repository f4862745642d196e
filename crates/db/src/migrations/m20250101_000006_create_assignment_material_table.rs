//! Create assignment material table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AssignmentMaterial::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssignmentMaterial::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AssignmentMaterial::AssignmentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentMaterial::FileName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AssignmentMaterial::FileType).string_len(128))
                    .col(
                        ColumnDef::new(AssignmentMaterial::FileUrl)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentMaterial::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignment_material_assignment")
                            .from(AssignmentMaterial::Table, AssignmentMaterial::AssignmentId)
                            .to(Assignment::Table, Assignment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assignment_material_assignment_id")
                    .table(AssignmentMaterial::Table)
                    .col(AssignmentMaterial::AssignmentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssignmentMaterial::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AssignmentMaterial {
    Table,
    Id,
    AssignmentId,
    FileName,
    FileType,
    FileUrl,
    CreatedAt,
}

#[derive(Iden)]
enum Assignment {
    Table,
    Id,
}
