use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::{user, user_role};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { UserRole }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::UserRole => Entity::has_many(user_role::Entity).into() }
    }
}

impl Related<user_role::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserRole.def() }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { user_role::Relation::User.def() }
    fn via() -> Option<RelationDef> { Some(user_role::Relation::Role.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str) -> Result<Model, errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("role name required".into())); }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Grant `role_id` to `user_id`.
pub async fn grant<C: ConnectionTrait>(db: &C, user_id: Uuid, role_id: Uuid) -> Result<(), errors::ModelError> {
    let am = user_role::ActiveModel { user_id: Set(user_id), role_id: Set(role_id) };
    user_role::Entity::insert(am)
        .exec_without_returning(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}
