use sea_orm::{entity::prelude::*, ActiveValue::Unchanged, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::{campaign_group, candidate, group, user, vote_candidate, vote_user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campaign")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<DateTimeWithTimeZone>,
    pub end_date: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Candidate,
    VoteUser,
    VoteCandidate,
    CampaignGroup,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::Candidate => Entity::has_many(candidate::Entity).into(),
            Relation::VoteUser => Entity::has_many(vote_user::Entity).into(),
            Relation::VoteCandidate => Entity::has_many(vote_candidate::Entity).into(),
            Relation::CampaignGroup => Entity::has_many(campaign_group::Entity).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<candidate::Entity> for Entity {
    fn to() -> RelationDef { Relation::Candidate.def() }
}

impl Related<vote_user::Entity> for Entity {
    fn to() -> RelationDef { Relation::VoteUser.def() }
}

impl Related<vote_candidate::Entity> for Entity {
    fn to() -> RelationDef { Relation::VoteCandidate.def() }
}

impl Related<campaign_group::Entity> for Entity {
    fn to() -> RelationDef { Relation::CampaignGroup.def() }
}

impl Related<group::Entity> for Entity {
    fn to() -> RelationDef { campaign_group::Relation::Group.def() }
    fn via() -> Option<RelationDef> { Some(campaign_group::Relation::Campaign.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

/// Scalar fields of a campaign about to be inserted.
#[derive(Clone, Debug)]
pub struct NewCampaign {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<DateTimeWithTimeZone>,
    pub end_date: Option<DateTimeWithTimeZone>,
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("campaign name required".into()));
    }
    Ok(())
}

pub fn validate_schedule(
    start: Option<&DateTimeWithTimeZone>,
    end: Option<&DateTimeWithTimeZone>,
) -> Result<(), errors::ModelError> {
    if let (Some(s), Some(e)) = (start, end) {
        if e < s {
            return Err(errors::ModelError::Validation("endDate must not precede startDate".into()));
        }
    }
    Ok(())
}

impl Model {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        validate_name(&self.name)?;
        validate_schedule(self.start_date.as_ref(), self.end_date.as_ref())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewCampaign) -> Result<Model, errors::ModelError> {
    validate_name(&new.name)?;
    validate_schedule(new.start_date.as_ref(), new.end_date.as_ref())?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(new.user_id),
        name: Set(new.name),
        description: Set(new.description),
        start_date: Set(new.start_date),
        end_date: Set(new.end_date),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Write every column of `model` back, stamping `updated_at`.
pub async fn overwrite<C: ConnectionTrait>(db: &C, model: Model) -> Result<Model, errors::ModelError> {
    model.validate()?;
    let am = ActiveModel {
        id: Unchanged(model.id),
        user_id: Set(model.user_id),
        name: Set(model.name),
        description: Set(model.description),
        start_date: Set(model.start_date),
        end_date: Set(model.end_date),
        created_at: Unchanged(model.created_at),
        updated_at: Set(Utc::now().into()),
    };
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    fn at(offset_days: i64) -> DateTimeWithTimeZone {
        (Utc::now() + Duration::days(offset_days)).with_timezone(&FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn schedule_rejects_end_before_start() {
        let err = validate_schedule(Some(&at(3)), Some(&at(1))).unwrap_err();
        assert!(err.to_string().contains("endDate"));
    }

    #[test]
    fn schedule_accepts_open_ranges() {
        assert!(validate_schedule(None, Some(&at(1))).is_ok());
        assert!(validate_schedule(Some(&at(1)), None).is_ok());
        assert!(validate_schedule(Some(&at(1)), Some(&at(2))).is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(validate_name("   ").is_err());
        assert!(validate_name("Student council 2025").is_ok());
    }
}
