use async_trait::async_trait;
use uuid::Uuid;

use models::{campaign, group};

use super::domain::{CampaignFilter, CampaignView, DeletedCounts, GroupWithCampaigns, Owner, Relations};
use crate::errors::ServiceError;

/// Repository abstraction for campaign persistence.
///
/// Multi-row writes (`insert_campaign`, `save_campaign`, `delete_campaigns`)
/// must be atomic: either every row change lands or none does.
#[async_trait]
pub trait CampaignRepository: Send + Sync {
    /// User by id with its roles.
    async fn find_owner(&self, user_id: Uuid) -> Result<Option<Owner>, ServiceError>;
    /// Groups whose id is in `ids`, in the order of `ids`. Unknown ids are skipped.
    async fn find_groups(&self, ids: &[Uuid]) -> Result<Vec<group::Model>, ServiceError>;
    /// Groups whose id is in `ids`, in the order of `ids`, each with its campaigns.
    async fn find_groups_with_campaigns(&self, ids: &[Uuid]) -> Result<Vec<GroupWithCampaigns>, ServiceError>;

    async fn find_campaign(&self, id: Uuid, relations: &Relations) -> Result<Option<CampaignView>, ServiceError>;
    /// Matching campaigns ordered by creation time.
    async fn find_campaigns(&self, filter: CampaignFilter, relations: &Relations) -> Result<Vec<CampaignView>, ServiceError>;

    /// Insert a campaign and link it to `group_ids`.
    async fn insert_campaign(&self, new: campaign::NewCampaign, group_ids: &[Uuid]) -> Result<campaign::Model, ServiceError>;
    /// Overwrite a campaign row; when `group_ids` is given, replace its group set too.
    async fn save_campaign(&self, campaign: campaign::Model, group_ids: Option<&[Uuid]>) -> Result<campaign::Model, ServiceError>;
    /// Remove vote-by-user, vote-by-candidate and candidate rows of the campaigns,
    /// then the campaigns themselves.
    async fn delete_campaigns(&self, ids: &[Uuid]) -> Result<DeletedCounts, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;
    use models::{candidate, role, user, vote_candidate, vote_user};

    use crate::campaign::domain::{order_by_ids, CampaignRelation, CandidateView};

    #[derive(Default)]
    struct Store {
        users: Vec<user::Model>,
        roles: HashMap<Uuid, Vec<role::Model>>, // key: user_id
        groups: Vec<group::Model>,
        campaigns: Vec<campaign::Model>,
        links: Vec<(Uuid, Uuid)>, // (campaign_id, group_id)
        candidates: Vec<candidate::Model>,
        vote_users: Vec<vote_user::Model>,
        vote_candidates: Vec<vote_candidate::Model>,
    }

    impl Store {
        fn view(&self, c: &campaign::Model, relations: &Relations) -> CampaignView {
            let mut view = CampaignView::bare(c.clone());
            if relations.contains(CampaignRelation::User) {
                view.user = self.users.iter().find(|u| u.id == c.user_id).cloned();
            }
            if relations.contains(CampaignRelation::Candidates) {
                let with_users = relations.contains(CampaignRelation::CandidateUsers);
                view.candidates = Some(
                    self.candidates
                        .iter()
                        .filter(|k| k.campaign_id == c.id)
                        .map(|k| CandidateView {
                            candidate: k.clone(),
                            user: if with_users {
                                k.user_id.and_then(|uid| self.users.iter().find(|u| u.id == uid).cloned())
                            } else {
                                None
                            },
                        })
                        .collect(),
                );
            }
            if relations.contains(CampaignRelation::Groups) {
                view.groups = Some(self.groups_of(c.id));
            }
            if relations.contains(CampaignRelation::Votes) {
                view.vote_users = Some(self.vote_users.iter().filter(|v| v.campaign_id == c.id).cloned().collect());
                view.vote_candidates = Some(self.vote_candidates.iter().filter(|v| v.campaign_id == c.id).cloned().collect());
            }
            view
        }

        fn groups_of(&self, campaign_id: Uuid) -> Vec<group::Model> {
            self.links
                .iter()
                .filter(|(cid, _)| *cid == campaign_id)
                .filter_map(|(_, gid)| self.groups.iter().find(|g| g.id == *gid).cloned())
                .collect()
        }
    }

    /// In-memory store with seeding helpers. Each trait call holds the lock for
    /// its whole duration, so multi-row writes are atomic.
    #[derive(Default)]
    pub struct MockCampaignRepository {
        store: Mutex<Store>,
        fail_deletes: AtomicBool,
    }

    impl MockCampaignRepository {
        fn store(&self) -> MutexGuard<'_, Store> {
            self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }

        pub fn add_user(&self, name: &str) -> user::Model {
            let u = user::Model {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                created_at: Utc::now().into(),
            };
            self.store().users.push(u.clone());
            u
        }

        pub fn grant_role(&self, user_id: Uuid, role_name: &str) {
            let r = role::Model { id: Uuid::new_v4(), name: role_name.to_string() };
            self.store().roles.entry(user_id).or_default().push(r);
        }

        pub fn add_group(&self, name: &str) -> group::Model {
            let g = group::Model { id: Uuid::new_v4(), name: name.to_string(), created_at: Utc::now().into() };
            self.store().groups.push(g.clone());
            g
        }

        pub fn add_candidate(&self, campaign_id: Uuid, user_id: Option<Uuid>, name: &str) -> candidate::Model {
            let k = candidate::Model {
                id: Uuid::new_v4(),
                campaign_id,
                user_id,
                name: name.to_string(),
                created_at: Utc::now().into(),
            };
            self.store().candidates.push(k.clone());
            k
        }

        pub fn add_vote_user(&self, campaign_id: Uuid, user_id: Uuid) -> vote_user::Model {
            let v = vote_user::Model { id: Uuid::new_v4(), campaign_id, user_id, created_at: Utc::now().into() };
            self.store().vote_users.push(v.clone());
            v
        }

        pub fn add_vote_candidate(&self, campaign_id: Uuid, candidate_id: Uuid) -> vote_candidate::Model {
            let v = vote_candidate::Model { id: Uuid::new_v4(), campaign_id, candidate_id, created_at: Utc::now().into() };
            self.store().vote_candidates.push(v.clone());
            v
        }

        /// (vote_users, vote_candidates, candidates) still referencing the campaign.
        pub fn dependents_of(&self, campaign_id: Uuid) -> (usize, usize, usize) {
            let s = self.store();
            (
                s.vote_users.iter().filter(|v| v.campaign_id == campaign_id).count(),
                s.vote_candidates.iter().filter(|v| v.campaign_id == campaign_id).count(),
                s.candidates.iter().filter(|k| k.campaign_id == campaign_id).count(),
            )
        }

        pub fn campaign_count(&self) -> usize {
            self.store().campaigns.len()
        }

        pub fn group_count(&self) -> usize {
            self.store().groups.len()
        }

        /// Make every subsequent `delete_campaigns` call fail without touching the store.
        pub fn fail_deletes(&self, fail: bool) {
            self.fail_deletes.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl CampaignRepository for MockCampaignRepository {
        async fn find_owner(&self, user_id: Uuid) -> Result<Option<Owner>, ServiceError> {
            let s = self.store();
            Ok(s.users.iter().find(|u| u.id == user_id).map(|u| Owner {
                user: u.clone(),
                roles: s.roles.get(&u.id).cloned().unwrap_or_default(),
            }))
        }

        async fn find_groups(&self, ids: &[Uuid]) -> Result<Vec<group::Model>, ServiceError> {
            let s = self.store();
            let mut found: Vec<group::Model> = s.groups.iter().filter(|g| ids.contains(&g.id)).cloned().collect();
            order_by_ids(&mut found, ids, |g| g.id);
            Ok(found)
        }

        async fn find_groups_with_campaigns(&self, ids: &[Uuid]) -> Result<Vec<GroupWithCampaigns>, ServiceError> {
            let s = self.store();
            let mut found: Vec<GroupWithCampaigns> = s
                .groups
                .iter()
                .filter(|g| ids.contains(&g.id))
                .map(|g| GroupWithCampaigns {
                    group: g.clone(),
                    campaigns: s
                        .campaigns
                        .iter()
                        .filter(|c| s.links.contains(&(c.id, g.id)))
                        .cloned()
                        .collect(),
                })
                .collect();
            order_by_ids(&mut found, ids, |g| g.group.id);
            Ok(found)
        }

        async fn find_campaign(&self, id: Uuid, relations: &Relations) -> Result<Option<CampaignView>, ServiceError> {
            let s = self.store();
            Ok(s.campaigns.iter().find(|c| c.id == id).map(|c| s.view(c, relations)))
        }

        async fn find_campaigns(&self, filter: CampaignFilter, relations: &Relations) -> Result<Vec<CampaignView>, ServiceError> {
            let s = self.store();
            Ok(s.campaigns.iter().filter(|c| filter.matches(c)).map(|c| s.view(c, relations)).collect())
        }

        async fn insert_campaign(&self, new: campaign::NewCampaign, group_ids: &[Uuid]) -> Result<campaign::Model, ServiceError> {
            campaign::validate_name(&new.name)?;
            campaign::validate_schedule(new.start_date.as_ref(), new.end_date.as_ref())?;
            let mut s = self.store();
            if !s.users.iter().any(|u| u.id == new.user_id) {
                return Err(ServiceError::Db("foreign key violation: campaign.user_id".into()));
            }
            let now = Utc::now().into();
            let c = campaign::Model {
                id: Uuid::new_v4(),
                user_id: new.user_id,
                name: new.name,
                description: new.description,
                start_date: new.start_date,
                end_date: new.end_date,
                created_at: now,
                updated_at: now,
            };
            s.links.extend(group_ids.iter().map(|gid| (c.id, *gid)));
            s.campaigns.push(c.clone());
            Ok(c)
        }

        async fn save_campaign(&self, campaign: campaign::Model, group_ids: Option<&[Uuid]>) -> Result<campaign::Model, ServiceError> {
            campaign.validate()?;
            let mut s = self.store();
            let Some(pos) = s.campaigns.iter().position(|c| c.id == campaign.id) else {
                return Err(ServiceError::Db("record not updated: campaign".into()));
            };
            let mut saved = campaign;
            saved.updated_at = Utc::now().into();
            s.campaigns[pos] = saved.clone();
            if let Some(gids) = group_ids {
                s.links.retain(|(cid, _)| *cid != saved.id);
                s.links.extend(gids.iter().map(|gid| (saved.id, *gid)));
            }
            Ok(saved)
        }

        async fn delete_campaigns(&self, ids: &[Uuid]) -> Result<DeletedCounts, ServiceError> {
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("connection reset by peer".into()));
            }
            let mut s = self.store();
            let mut counts = DeletedCounts::default();

            let before = s.vote_users.len();
            s.vote_users.retain(|v| !ids.contains(&v.campaign_id));
            counts.vote_users = (before - s.vote_users.len()) as u64;

            let before = s.vote_candidates.len();
            s.vote_candidates.retain(|v| !ids.contains(&v.campaign_id));
            counts.vote_candidates = (before - s.vote_candidates.len()) as u64;

            let before = s.candidates.len();
            s.candidates.retain(|k| !ids.contains(&k.campaign_id));
            counts.candidates = (before - s.candidates.len()) as u64;

            s.links.retain(|(cid, _)| !ids.contains(cid));
            let before = s.campaigns.len();
            s.campaigns.retain(|c| !ids.contains(&c.id));
            counts.campaigns = (before - s.campaigns.len()) as u64;

            Ok(counts)
        }
    }
}
