//! Create `campaign` table owned by a `user`.
//!
//! Owner deletion is restricted while the user still owns campaigns.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campaign::Table)
                    .if_not_exists()
                    .col(uuid(Campaign::Id).primary_key())
                    .col(uuid(Campaign::UserId).not_null())
                    .col(string_len(Campaign::Name, 255).not_null())
                    .col(text_null(Campaign::Description))
                    .col(timestamp_with_time_zone_null(Campaign::StartDate))
                    .col(timestamp_with_time_zone_null(Campaign::EndDate))
                    .col(timestamp_with_time_zone(Campaign::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Campaign::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_user")
                            .from(Campaign::Table, Campaign::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Campaign::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Campaign { Table, Id, UserId, Name, Description, StartDate, EndDate, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
