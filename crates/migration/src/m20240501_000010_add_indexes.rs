use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Campaign: lookups by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_campaign_user")
                    .table(Campaign::Table)
                    .col(Campaign::UserId)
                    .to_owned(),
            )
            .await?;

        // CampaignGroup: reverse lookup from group to campaigns
        manager
            .create_index(
                Index::create()
                    .name("idx_campaign_group_group")
                    .table(CampaignGroup::Table)
                    .col(CampaignGroup::GroupId)
                    .to_owned(),
            )
            .await?;

        // Dependents deleted by campaign id
        manager
            .create_index(
                Index::create()
                    .name("idx_candidate_campaign")
                    .table(Candidate::Table)
                    .col(Candidate::CampaignId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_user_campaign")
                    .table(VoteUser::Table)
                    .col(VoteUser::CampaignId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_candidate_campaign")
                    .table(VoteCandidate::Table)
                    .col(VoteCandidate::CampaignId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_vote_candidate_campaign").table(VoteCandidate::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_vote_user_campaign").table(VoteUser::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_candidate_campaign").table(Candidate::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_campaign_group_group").table(CampaignGroup::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_campaign_user").table(Campaign::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Campaign { Table, UserId }

#[derive(DeriveIden)]
enum CampaignGroup { Table, GroupId }

#[derive(DeriveIden)]
enum Candidate { Table, CampaignId }

#[derive(DeriveIden)]
enum VoteUser { Table, CampaignId }

#[derive(DeriveIden)]
enum VoteCandidate { Table, CampaignId }
