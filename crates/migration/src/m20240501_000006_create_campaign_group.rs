//! Many-to-many link between campaigns and groups.
//!
//! Rows follow either side on delete; the groups themselves are independent.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CampaignGroup::Table)
                    .if_not_exists()
                    .col(uuid(CampaignGroup::CampaignId).not_null())
                    .col(uuid(CampaignGroup::GroupId).not_null())
                    .primary_key(
                        Index::create()
                            .col(CampaignGroup::CampaignId)
                            .col(CampaignGroup::GroupId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_group_campaign")
                            .from(CampaignGroup::Table, CampaignGroup::CampaignId)
                            .to(Campaign::Table, Campaign::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_group_group")
                            .from(CampaignGroup::Table, CampaignGroup::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CampaignGroup::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CampaignGroup { Table, CampaignId, GroupId }

#[derive(DeriveIden)]
enum Campaign { Table, Id }

#[derive(DeriveIden)]
enum Group { Table, Id }
