//! Migration: Create attendees table.

use sea_orm_migration::prelude::*;

/// One registration per user and event.
pub const EVENT_USER_INDEX: &str = "idx_attendees_event_user";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Attendees::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Attendees::EventId).uuid().not_null())
                    .col(ColumnDef::new(Attendees::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Attendees::TicketNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Attendees::Status)
                            .string_len(16)
                            .not_null()
                            .default("REGISTERED"),
                    )
                    .col(
                        ColumnDef::new(Attendees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attendees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(EVENT_USER_INDEX)
                    .table(Attendees::Table)
                    .col(Attendees::EventId)
                    .col(Attendees::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendees_user")
                    .table(Attendees::Table)
                    .col(Attendees::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendees::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Attendees {
    Table,
    Id,
    EventId,
    UserId,
    TicketNumber,
    Status,
    CreatedAt,
    UpdatedAt,
}
