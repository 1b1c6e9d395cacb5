use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::{campaign, user, vote_candidate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "candidate")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Campaign, User, VoteCandidate }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Campaign => Entity::belongs_to(campaign::Entity).from(Column::CampaignId).to(campaign::Column::Id).into(),
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
            Relation::VoteCandidate => Entity::has_many(vote_candidate::Entity).into(),
        }
    }
}

impl Related<campaign::Entity> for Entity {
    fn to() -> RelationDef { Relation::Campaign.def() }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<vote_candidate::Entity> for Entity {
    fn to() -> RelationDef { Relation::VoteCandidate.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    campaign_id: Uuid,
    user_id: Option<Uuid>,
    name: &str,
) -> Result<Model, errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("candidate name required".into())); }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        campaign_id: Set(campaign_id),
        user_id: Set(user_id),
        name: Set(name.to_string()),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
