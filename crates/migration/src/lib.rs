//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240501_000001_create_user;
mod m20240501_000002_create_role;
mod m20240501_000003_create_user_role;
mod m20240501_000004_create_group;
mod m20240501_000005_create_campaign;
mod m20240501_000006_create_campaign_group;
mod m20240501_000007_create_candidate;
mod m20240501_000008_create_vote_user;
mod m20240501_000009_create_vote_candidate;
mod m20240501_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240501_000001_create_user::Migration),
            Box::new(m20240501_000002_create_role::Migration),
            Box::new(m20240501_000003_create_user_role::Migration),
            Box::new(m20240501_000004_create_group::Migration),
            Box::new(m20240501_000005_create_campaign::Migration),
            Box::new(m20240501_000006_create_campaign_group::Migration),
            Box::new(m20240501_000007_create_candidate::Migration),
            Box::new(m20240501_000008_create_vote_user::Migration),
            Box::new(m20240501_000009_create_vote_candidate::Migration),
            // Indexes should always be applied last
            Box::new(m20240501_000010_add_indexes::Migration),
        ]
    }
}
