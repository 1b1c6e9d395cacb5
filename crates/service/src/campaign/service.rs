use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use models::{campaign, group};

use super::domain::{
    dedup_campaigns, CampaignFilter, CampaignRelation, CampaignView, CreateCampaignInput, DeleteOutcome,
    GroupRef, Relations, UpdateCampaignInput,
};
use super::policy::{AllowAll, CampaignPolicy};
use super::repository::CampaignRepository;
use crate::errors::ServiceError;

/// Campaign business service independent of web framework
pub struct CampaignService<R: CampaignRepository + ?Sized> {
    repo: Arc<R>,
    policy: Arc<dyn CampaignPolicy>,
}

impl<R: CampaignRepository + ?Sized> CampaignService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo, policy: Arc::new(AllowAll) }
    }

    pub fn with_policy(repo: Arc<R>, policy: Arc<dyn CampaignPolicy>) -> Self {
        Self { repo, policy }
    }

    /// Resolve every referenced group or fail with BadRequest.
    async fn resolve_groups(&self, refs: &[GroupRef]) -> Result<Vec<group::Model>, ServiceError> {
        let ids: Vec<Uuid> = refs.iter().map(|g| g.id).collect();
        let found = self.repo.find_groups(&ids).await?;
        if found.len() != ids.len() {
            debug!(requested = ids.len(), found = found.len(), "group_count_mismatch");
            return Err(ServiceError::BadRequest("one or more groups not found".into()));
        }
        Ok(found)
    }

    /// Create a campaign owned by `input.user_id`, optionally attached to groups.
    ///
    /// # Examples
    /// ```
    /// use service::campaign::{CampaignService, repository::mock::MockCampaignRepository};
    /// use service::campaign::domain::{CreateCampaignInput, GroupRef};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockCampaignRepository::default());
    /// let owner = repo.add_user("Ada");
    /// let group = repo.add_group("Faculty");
    /// let svc = CampaignService::new(repo.clone());
    /// let input = CreateCampaignInput {
    ///     user_id: owner.id,
    ///     name: "Dean election".into(),
    ///     description: None,
    ///     start_date: None,
    ///     end_date: None,
    ///     groups: Some(vec![GroupRef { id: group.id }]),
    /// };
    /// let created = tokio_test::block_on(svc.create_campaign(input)).unwrap();
    /// assert_eq!(created.user.unwrap().id, owner.id);
    /// assert_eq!(created.groups.unwrap().len(), 1);
    /// ```
    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn create_campaign(&self, input: CreateCampaignInput) -> Result<CampaignView, ServiceError> {
        let owner = self
            .repo
            .find_owner(input.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))?;

        let groups = match input.groups.as_deref() {
            Some(refs) if !refs.is_empty() => self.resolve_groups(refs).await?,
            _ => Vec::new(),
        };

        self.policy.authorize_create(&owner)?;

        campaign::validate_name(&input.name)?;
        campaign::validate_schedule(input.start_date.as_ref(), input.end_date.as_ref())?;

        let new = campaign::NewCampaign {
            user_id: owner.user.id,
            name: input.name,
            description: input.description,
            start_date: input.start_date,
            end_date: input.end_date,
        };
        let group_ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
        let created = self.repo.insert_campaign(new, &group_ids).await?;
        info!(campaign_id = %created.id, user_id = %created.user_id, groups = group_ids.len(), "campaign_created");

        let mut view = CampaignView::bare(created);
        view.user = Some(owner.user);
        view.groups = Some(groups);
        Ok(view)
    }

    /// Every campaign with its owner.
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<CampaignView>, ServiceError> {
        self.repo
            .find_campaigns(CampaignFilter::All, &Relations::of(&[CampaignRelation::User]))
            .await
    }

    /// One campaign with its owner, candidates and each candidate's user.
    #[instrument(skip(self))]
    pub async fn find_one(&self, id: Uuid) -> Result<CampaignView, ServiceError> {
        let relations = Relations::of(&[CampaignRelation::User, CampaignRelation::CandidateUsers]);
        self.repo
            .find_campaign(id, &relations)
            .await?
            .ok_or_else(|| ServiceError::not_found("campaign"))
    }

    #[instrument(skip(self))]
    pub async fn get_campaigns_by_user_id(&self, user_id: Uuid) -> Result<Vec<CampaignView>, ServiceError> {
        self.repo
            .find_campaigns(CampaignFilter::Owner(user_id), &Relations::of(&[CampaignRelation::Candidates]))
            .await
    }

    /// Campaigns linked to any of the groups, each listed once in first-seen order.
    #[instrument(skip(self, group_ids), fields(groups = group_ids.len()))]
    pub async fn get_campaigns_by_groups(&self, group_ids: &[Uuid]) -> Result<Vec<CampaignView>, ServiceError> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }
        let groups = self.repo.find_groups_with_campaigns(group_ids).await?;
        Ok(dedup_campaigns(groups).into_iter().map(CampaignView::bare).collect())
    }

    /// Overwrite the fields present in `input`. A present `groups` list replaces
    /// the whole group set.
    #[instrument(skip(self, input))]
    pub async fn update_campaign(&self, id: Uuid, input: UpdateCampaignInput) -> Result<CampaignView, ServiceError> {
        let mut current = self
            .repo
            .find_campaign(id, &Relations::none())
            .await?
            .ok_or_else(|| ServiceError::not_found("campaign"))?
            .campaign;

        let group_ids: Option<Vec<Uuid>> = match input.groups.as_deref() {
            Some([]) => Some(Vec::new()),
            Some(refs) => Some(self.resolve_groups(refs).await?.iter().map(|g| g.id).collect()),
            None => None,
        };

        if let Some(user_id) = input.user_id {
            let owner = self
                .repo
                .find_owner(user_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("user"))?;
            current.user_id = owner.user.id;
        }

        input.apply_scalars(&mut current);
        current.validate()?;

        let saved = self.repo.save_campaign(current, group_ids.as_deref()).await?;
        info!(campaign_id = %saved.id, groups_replaced = group_ids.is_some(), "campaign_updated");

        self.repo
            .find_campaign(saved.id, &Relations::of(&[CampaignRelation::User, CampaignRelation::Groups]))
            .await?
            .ok_or_else(|| ServiceError::not_found("campaign"))
    }

    /// Delete the campaigns matching `ids` along with their candidates and votes.
    ///
    /// Lookup and delete failures come back as [`ServiceError::Internal`]
    /// carrying the requested ids; a request matching nothing is NotFound.
    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    pub async fn delete_campaigns(&self, ids: &[Uuid]) -> Result<DeleteOutcome, ServiceError> {
        if ids.is_empty() {
            return Err(ServiceError::BadRequest("ids must be a non-empty list".into()));
        }

        let relations = Relations::of(&[CampaignRelation::Candidates, CampaignRelation::Votes]);
        let found = self
            .repo
            .find_campaigns(CampaignFilter::Ids(ids.to_vec()), &relations)
            .await
            .map_err(|e| ServiceError::internal(ids, e))?;
        if found.is_empty() {
            return Err(ServiceError::NotFound("no campaigns found for the given ids".into()));
        }

        let resolved: Vec<Uuid> = found.iter().map(CampaignView::id).collect();
        let counts = self
            .repo
            .delete_campaigns(&resolved)
            .await
            .map_err(|e| ServiceError::internal(ids, e))?;
        info!(
            campaigns = counts.campaigns,
            candidates = counts.candidates,
            vote_users = counts.vote_users,
            vote_candidates = counts.vote_candidates,
            "campaigns_deleted"
        );

        Ok(DeleteOutcome { message: "campaigns deleted".into(), deleted: counts.campaigns })
    }
}
