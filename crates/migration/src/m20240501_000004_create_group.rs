use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Group::Table)
                    .if_not_exists()
                    .col(uuid(Group::Id).primary_key())
                    .col(string_len(Group::Name, 128).not_null())
                    .col(timestamp_with_time_zone(Group::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Group::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Group { Table, Id, Name, CreatedAt }
