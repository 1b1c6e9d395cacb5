use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::{campaign, campaign_group};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { CampaignGroup }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::CampaignGroup => Entity::has_many(campaign_group::Entity).into() }
    }
}

impl Related<campaign_group::Entity> for Entity {
    fn to() -> RelationDef { Relation::CampaignGroup.def() }
}

impl Related<campaign::Entity> for Entity {
    fn to() -> RelationDef { campaign_group::Relation::Campaign.def() }
    fn via() -> Option<RelationDef> { Some(campaign_group::Relation::Group.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str) -> Result<Model, errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("group name required".into())); }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
