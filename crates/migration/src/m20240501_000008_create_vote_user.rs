use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VoteUser::Table)
                    .if_not_exists()
                    .col(uuid(VoteUser::Id).primary_key())
                    .col(uuid(VoteUser::CampaignId).not_null())
                    .col(uuid(VoteUser::UserId).not_null())
                    .col(timestamp_with_time_zone(VoteUser::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_user_campaign")
                            .from(VoteUser::Table, VoteUser::CampaignId)
                            .to(Campaign::Table, Campaign::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_user_user")
                            .from(VoteUser::Table, VoteUser::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(VoteUser::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum VoteUser { Table, Id, CampaignId, UserId, CreatedAt }

#[derive(DeriveIden)]
enum Campaign { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
