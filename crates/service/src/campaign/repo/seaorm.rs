use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use models::errors::ModelError;
use models::{campaign, campaign_group, candidate, group, role, user, vote_candidate, vote_user};

use crate::campaign::domain::{
    order_by_ids, CampaignFilter, CampaignRelation, CampaignView, CandidateView, DeletedCounts,
    GroupWithCampaigns, Owner, Relations,
};
use crate::campaign::repository::CampaignRepository;
use crate::errors::ServiceError;

/// SeaORM-backed repository implementation.
pub struct SeaOrmCampaignRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCampaignRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn users_by_id(&self, ids: Vec<Uuid>) -> Result<HashMap<Uuid, user::Model>, ServiceError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = user::Entity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(rows.into_iter().map(|u| (u.id, u)).collect())
    }

    /// Attach the requested relations to `campaigns`, one batched query per relation.
    async fn populate(&self, campaigns: Vec<campaign::Model>, relations: &Relations) -> Result<Vec<CampaignView>, ServiceError> {
        let mut views: Vec<CampaignView> = campaigns.into_iter().map(CampaignView::bare).collect();
        if views.is_empty() || relations.is_empty() {
            return Ok(views);
        }
        let ids: Vec<Uuid> = views.iter().map(CampaignView::id).collect();

        if relations.contains(CampaignRelation::User) {
            let owners = self.users_by_id(views.iter().map(|v| v.campaign.user_id).collect()).await?;
            for v in views.iter_mut() {
                v.user = owners.get(&v.campaign.user_id).cloned();
            }
        }

        if relations.contains(CampaignRelation::Candidates) {
            let rows = candidate::Entity::find()
                .filter(candidate::Column::CampaignId.is_in(ids.clone()))
                .order_by_asc(candidate::Column::CreatedAt)
                .all(&self.db)
                .await
                .map_err(ServiceError::db)?;
            let linked = if relations.contains(CampaignRelation::CandidateUsers) {
                self.users_by_id(rows.iter().filter_map(|k| k.user_id).collect()).await?
            } else {
                HashMap::new()
            };
            let mut by_campaign: HashMap<Uuid, Vec<CandidateView>> = HashMap::new();
            for k in rows {
                let user = k.user_id.and_then(|uid| linked.get(&uid).cloned());
                by_campaign.entry(k.campaign_id).or_default().push(CandidateView { candidate: k, user });
            }
            for v in views.iter_mut() {
                v.candidates = Some(by_campaign.remove(&v.id()).unwrap_or_default());
            }
        }

        if relations.contains(CampaignRelation::Groups) {
            let links = campaign_group::Entity::find()
                .filter(campaign_group::Column::CampaignId.is_in(ids.clone()))
                .all(&self.db)
                .await
                .map_err(ServiceError::db)?;
            let groups: HashMap<Uuid, group::Model> = if links.is_empty() {
                HashMap::new()
            } else {
                group::Entity::find()
                    .filter(group::Column::Id.is_in(links.iter().map(|l| l.group_id).collect::<Vec<_>>()))
                    .order_by_asc(group::Column::CreatedAt)
                    .all(&self.db)
                    .await
                    .map_err(ServiceError::db)?
                    .into_iter()
                    .map(|g| (g.id, g))
                    .collect()
            };
            let mut by_campaign: HashMap<Uuid, Vec<group::Model>> = HashMap::new();
            for l in links {
                if let Some(g) = groups.get(&l.group_id) {
                    by_campaign.entry(l.campaign_id).or_default().push(g.clone());
                }
            }
            for v in views.iter_mut() {
                v.groups = Some(by_campaign.remove(&v.id()).unwrap_or_default());
            }
        }

        if relations.contains(CampaignRelation::Votes) {
            let mut by_user: HashMap<Uuid, Vec<vote_user::Model>> = HashMap::new();
            for row in vote_user::Entity::find()
                .filter(vote_user::Column::CampaignId.is_in(ids.clone()))
                .order_by_asc(vote_user::Column::CreatedAt)
                .all(&self.db)
                .await
                .map_err(ServiceError::db)?
            {
                by_user.entry(row.campaign_id).or_default().push(row);
            }
            let mut by_candidate: HashMap<Uuid, Vec<vote_candidate::Model>> = HashMap::new();
            for row in vote_candidate::Entity::find()
                .filter(vote_candidate::Column::CampaignId.is_in(ids))
                .order_by_asc(vote_candidate::Column::CreatedAt)
                .all(&self.db)
                .await
                .map_err(ServiceError::db)?
            {
                by_candidate.entry(row.campaign_id).or_default().push(row);
            }
            for v in views.iter_mut() {
                v.vote_users = Some(by_user.remove(&v.id()).unwrap_or_default());
                v.vote_candidates = Some(by_candidate.remove(&v.id()).unwrap_or_default());
            }
        }

        Ok(views)
    }
}

/// Keep validation failures as client errors and everything else as storage errors.
fn from_model(e: ModelError) -> ServiceError {
    match e {
        ModelError::Db(msg) => ServiceError::Db(msg),
        other => ServiceError::Model(other),
    }
}

#[async_trait::async_trait]
impl CampaignRepository for SeaOrmCampaignRepository {
    async fn find_owner(&self, user_id: Uuid) -> Result<Option<Owner>, ServiceError> {
        let Some(u) = user::Entity::find_by_id(user_id).one(&self.db).await.map_err(ServiceError::db)? else {
            return Ok(None);
        };
        let roles = u.find_related(role::Entity).all(&self.db).await.map_err(ServiceError::db)?;
        Ok(Some(Owner { user: u, roles }))
    }

    async fn find_groups(&self, ids: &[Uuid]) -> Result<Vec<group::Model>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut found = group::Entity::find()
            .filter(group::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        order_by_ids(&mut found, ids, |g| g.id);
        Ok(found)
    }

    async fn find_groups_with_campaigns(&self, ids: &[Uuid]) -> Result<Vec<GroupWithCampaigns>, ServiceError> {
        let groups = self.find_groups(ids).await?;
        if groups.is_empty() {
            return Ok(Vec::new());
        }
        let links = campaign_group::Entity::find()
            .filter(campaign_group::Column::GroupId.is_in(groups.iter().map(|g| g.id).collect::<Vec<_>>()))
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        let campaigns = if links.is_empty() {
            Vec::new()
        } else {
            campaign::Entity::find()
                .filter(campaign::Column::Id.is_in(links.iter().map(|l| l.campaign_id).collect::<Vec<_>>()))
                .order_by_asc(campaign::Column::CreatedAt)
                .all(&self.db)
                .await
                .map_err(ServiceError::db)?
        };
        Ok(groups
            .into_iter()
            .map(|g| {
                let linked: Vec<campaign::Model> = campaigns
                    .iter()
                    .filter(|c| links.iter().any(|l| l.group_id == g.id && l.campaign_id == c.id))
                    .cloned()
                    .collect();
                GroupWithCampaigns { group: g, campaigns: linked }
            })
            .collect())
    }

    async fn find_campaign(&self, id: Uuid, relations: &Relations) -> Result<Option<CampaignView>, ServiceError> {
        let Some(c) = campaign::Entity::find_by_id(id).one(&self.db).await.map_err(ServiceError::db)? else {
            return Ok(None);
        };
        Ok(self.populate(vec![c], relations).await?.pop())
    }

    async fn find_campaigns(&self, filter: CampaignFilter, relations: &Relations) -> Result<Vec<CampaignView>, ServiceError> {
        let mut q = campaign::Entity::find();
        match filter {
            CampaignFilter::All => {}
            CampaignFilter::Ids(ids) => {
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                q = q.filter(campaign::Column::Id.is_in(ids));
            }
            CampaignFilter::Owner(uid) => q = q.filter(campaign::Column::UserId.eq(uid)),
        }
        let rows = q
            .order_by_asc(campaign::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        self.populate(rows, relations).await
    }

    async fn insert_campaign(&self, new: campaign::NewCampaign, group_ids: &[Uuid]) -> Result<campaign::Model, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db)?;
        let created = campaign::create(&txn, new).await.map_err(from_model)?;
        campaign_group::replace_for_campaign(&txn, created.id, group_ids).await.map_err(from_model)?;
        txn.commit().await.map_err(ServiceError::db)?;
        Ok(created)
    }

    async fn save_campaign(&self, campaign: campaign::Model, group_ids: Option<&[Uuid]>) -> Result<campaign::Model, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db)?;
        let id = campaign.id;
        let saved = campaign::overwrite(&txn, campaign).await.map_err(from_model)?;
        if let Some(gids) = group_ids {
            campaign_group::replace_for_campaign(&txn, id, gids).await.map_err(from_model)?;
        }
        txn.commit().await.map_err(ServiceError::db)?;
        Ok(saved)
    }

    async fn delete_campaigns(&self, ids: &[Uuid]) -> Result<DeletedCounts, ServiceError> {
        // Dependents reference campaign with RESTRICT, so they go first.
        // Dropping `txn` on an early return rolls everything back.
        let txn = self.db.begin().await.map_err(ServiceError::db)?;
        let vote_users = vote_user::Entity::delete_many()
            .filter(vote_user::Column::CampaignId.is_in(ids.to_vec()))
            .exec(&txn)
            .await
            .map_err(ServiceError::db)?
            .rows_affected;
        let vote_candidates = vote_candidate::Entity::delete_many()
            .filter(vote_candidate::Column::CampaignId.is_in(ids.to_vec()))
            .exec(&txn)
            .await
            .map_err(ServiceError::db)?
            .rows_affected;
        let candidates = candidate::Entity::delete_many()
            .filter(candidate::Column::CampaignId.is_in(ids.to_vec()))
            .exec(&txn)
            .await
            .map_err(ServiceError::db)?
            .rows_affected;
        let campaigns = campaign::Entity::delete_many()
            .filter(campaign::Column::Id.is_in(ids.to_vec()))
            .exec(&txn)
            .await
            .map_err(ServiceError::db)?
            .rows_affected;
        txn.commit().await.map_err(ServiceError::db)?;
        Ok(DeletedCounts { vote_users, vote_candidates, candidates, campaigns })
    }
}
