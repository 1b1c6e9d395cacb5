//! Authorization hook consulted before a campaign is created.
//!
//! Nothing is enforced by default; a deployment opts in through configuration.

use tracing::warn;

use super::domain::Owner;
use crate::errors::ServiceError;

pub trait CampaignPolicy: Send + Sync {
    fn authorize_create(&self, owner: &Owner) -> Result<(), ServiceError>;
}

/// Lets every resolved owner create campaigns.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl CampaignPolicy for AllowAll {
    fn authorize_create(&self, _owner: &Owner) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// Only owners holding `role` may create campaigns.
#[derive(Clone, Debug)]
pub struct RequireRole {
    role: String,
}

impl RequireRole {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }
}

impl CampaignPolicy for RequireRole {
    fn authorize_create(&self, owner: &Owner) -> Result<(), ServiceError> {
        if owner.has_role(&self.role) {
            return Ok(());
        }
        warn!(user_id = %owner.user.id, required = %self.role, "campaign_create_denied");
        Err(ServiceError::Forbidden(format!("only users with role '{}' can create campaigns", self.role)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use models::{role, user};
    use uuid::Uuid;

    fn owner(roles: &[&str]) -> Owner {
        Owner {
            user: user::Model { id: Uuid::new_v4(), name: "o".into(), email: "o@example.com".into(), created_at: Utc::now().into() },
            roles: roles.iter().map(|r| role::Model { id: Uuid::new_v4(), name: (*r).into() }).collect(),
        }
    }

    #[test]
    fn allow_all_ignores_roles() {
        assert!(AllowAll.authorize_create(&owner(&[])).is_ok());
    }

    #[test]
    fn require_role_checks_membership() {
        let p = RequireRole::new("moderator");
        assert!(p.authorize_create(&owner(&["voter", "moderator"])).is_ok());
        assert!(matches!(p.authorize_create(&owner(&["voter"])), Err(ServiceError::Forbidden(_))));
    }
}
