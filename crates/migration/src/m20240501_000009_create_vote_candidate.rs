use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VoteCandidate::Table)
                    .if_not_exists()
                    .col(uuid(VoteCandidate::Id).primary_key())
                    .col(uuid(VoteCandidate::CampaignId).not_null())
                    .col(uuid(VoteCandidate::CandidateId).not_null())
                    .col(timestamp_with_time_zone(VoteCandidate::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_candidate_campaign")
                            .from(VoteCandidate::Table, VoteCandidate::CampaignId)
                            .to(Campaign::Table, Campaign::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_candidate_candidate")
                            .from(VoteCandidate::Table, VoteCandidate::CandidateId)
                            .to(Candidate::Table, Candidate::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(VoteCandidate::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum VoteCandidate { Table, Id, CampaignId, CandidateId, CreatedAt }

#[derive(DeriveIden)]
enum Campaign { Table, Id }

#[derive(DeriveIden)]
enum Candidate { Table, Id }
