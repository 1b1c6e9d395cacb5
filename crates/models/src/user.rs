use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::{campaign, role, user_role};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Campaign,
    UserRole,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Campaign => Entity::has_many(campaign::Entity).into(),
            Relation::UserRole => Entity::has_many(user_role::Entity).into(),
        }
    }
}

impl Related<campaign::Entity> for Entity {
    fn to() -> RelationDef { Relation::Campaign.def() }
}

impl Related<user_role::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserRole.def() }
}

impl Related<role::Entity> for Entity {
    fn to() -> RelationDef { user_role::Relation::Role.def() }
    fn via() -> Option<RelationDef> { Some(user_role::Relation::User.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if !email.contains('@') { return Err(errors::ModelError::Validation("invalid email".into())); }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str, email: &str) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_email(email)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
