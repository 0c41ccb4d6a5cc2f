//! Migration: Create classrooms and borrowings tables.

use sea_orm_migration::prelude::*;

use super::m20241016_000001_create_departments_and_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Classrooms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Classrooms::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Classrooms::Name).string().not_null())
                    .col(ColumnDef::new(Classrooms::Place).string().not_null())
                    .col(ColumnDef::new(Classrooms::Description).text().not_null())
                    .to_owned(),
            )
            .await?;

        // Borrows go away with their user or classroom
        manager
            .create_table(
                Table::create()
                    .table(Borrowings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Borrowings::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Borrowings::UserId).string().not_null())
                    .col(ColumnDef::new(Borrowings::ClassroomId).string().not_null())
                    .col(
                        ColumnDef::new(Borrowings::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Borrowings::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Borrowings::FromSlot).integer().not_null())
                    .col(ColumnDef::new(Borrowings::ToSlot).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_borrowings_user_id")
                            .from(Borrowings::Table, Borrowings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_borrowings_classroom_id")
                            .from(Borrowings::Table, Borrowings::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_borrowings_user_id_start_time")
                    .table(Borrowings::Table)
                    .col(Borrowings::UserId)
                    .col(Borrowings::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_borrowings_classroom_id")
                    .table(Borrowings::Table)
                    .col(Borrowings::ClassroomId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Borrowings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Classrooms::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Classrooms {
    Table,
    Id,
    Name,
    Place,
    Description,
}

#[derive(Iden)]
enum Borrowings {
    Table,
    Id,
    UserId,
    ClassroomId,
    StartTime,
    EndTime,
    FromSlot,
    ToSlot,
}
