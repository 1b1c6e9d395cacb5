//! Create `candidate` table.
//!
//! The campaign FK restricts deletes: dependents are removed explicitly
//! before their campaign.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Candidate::Table)
                    .if_not_exists()
                    .col(uuid(Candidate::Id).primary_key())
                    .col(uuid(Candidate::CampaignId).not_null())
                    .col(uuid_null(Candidate::UserId))
                    .col(string_len(Candidate::Name, 255).not_null())
                    .col(timestamp_with_time_zone(Candidate::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_candidate_campaign")
                            .from(Candidate::Table, Candidate::CampaignId)
                            .to(Campaign::Table, Campaign::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_candidate_user")
                            .from(Candidate::Table, Candidate::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Candidate::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Candidate { Table, Id, CampaignId, UserId, Name, CreatedAt }

#[derive(DeriveIden)]
enum Campaign { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
