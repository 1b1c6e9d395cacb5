use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::{campaign, candidate};

/// A vote tallied against a candidate of a campaign.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vote_candidate")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub candidate_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Campaign, Candidate }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Campaign => Entity::belongs_to(campaign::Entity).from(Column::CampaignId).to(campaign::Column::Id).into(),
            Relation::Candidate => Entity::belongs_to(candidate::Entity).from(Column::CandidateId).to(candidate::Column::Id).into(),
        }
    }
}

impl Related<campaign::Entity> for Entity {
    fn to() -> RelationDef { Relation::Campaign.def() }
}

impl Related<candidate::Entity> for Entity {
    fn to() -> RelationDef { Relation::Candidate.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(db: &C, campaign_id: Uuid, candidate_id: Uuid) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        campaign_id: Set(campaign_id),
        candidate_id: Set(candidate_id),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
