use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{campaign, group};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campaign_group")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub campaign_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub group_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Campaign, Group }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Campaign => Entity::belongs_to(campaign::Entity).from(Column::CampaignId).to(campaign::Column::Id).into(),
            Relation::Group => Entity::belongs_to(group::Entity).from(Column::GroupId).to(group::Column::Id).into(),
        }
    }
}

impl Related<campaign::Entity> for Entity {
    fn to() -> RelationDef { Relation::Campaign.def() }
}

impl Related<group::Entity> for Entity {
    fn to() -> RelationDef { Relation::Group.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Replace the full group set of a campaign with `group_ids`.
pub async fn replace_for_campaign<C: ConnectionTrait>(
    db: &C,
    campaign_id: Uuid,
    group_ids: &[Uuid],
) -> Result<(), crate::errors::ModelError> {
    use sea_orm::{QueryFilter, Set};

    Entity::delete_many()
        .filter(Column::CampaignId.eq(campaign_id))
        .exec(db)
        .await
        .map_err(|e| crate::errors::ModelError::Db(e.to_string()))?;
    if group_ids.is_empty() {
        return Ok(());
    }
    let rows = group_ids.iter().map(|gid| ActiveModel { campaign_id: Set(campaign_id), group_id: Set(*gid) });
    Entity::insert_many(rows)
        .exec_without_returning(db)
        .await
        .map_err(|e| crate::errors::ModelError::Db(e.to_string()))?;
    Ok(())
}
