use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use models::{campaign, candidate, group, role, user, vote_candidate, vote_user};

/// Reference to an existing group inside a campaign payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: Uuid,
}

/// Payload for creating a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignInput {
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub end_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub groups: Option<Vec<GroupRef>>,
}

/// Payload for replacing campaign fields.
///
/// Every field is optional: absent fields are left untouched, present fields
/// overwrite the stored value. Nullable columns use a nested `Option` so an
/// explicit `null` clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignInput {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub start_date: Option<Option<DateTime<FixedOffset>>>,
    #[serde(default, deserialize_with = "present")]
    pub end_date: Option<Option<DateTime<FixedOffset>>>,
    #[serde(default)]
    pub groups: Option<Vec<GroupRef>>,
}

fn present<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

impl UpdateCampaignInput {
    /// Shallow-merge the scalar fields onto `campaign`. Owner and groups are
    /// resolved by the service before they are applied.
    pub fn apply_scalars(&self, campaign: &mut campaign::Model) {
        if let Some(name) = &self.name {
            campaign.name = name.clone();
        }
        if let Some(description) = &self.description {
            campaign.description = description.clone();
        }
        if let Some(start) = self.start_date {
            campaign.start_date = start;
        }
        if let Some(end) = self.end_date {
            campaign.end_date = end;
        }
    }
}

/// Related data that can be populated on a campaign read.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CampaignRelation {
    /// Owning user.
    User,
    Candidates,
    /// The user linked to each candidate. Implies `Candidates`.
    CandidateUsers,
    Groups,
    /// Vote-by-user and vote-by-candidate records.
    Votes,
}

/// Set of relations to populate, passed explicitly to every read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Relations(BTreeSet<CampaignRelation>);

impl Relations {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn of(relations: &[CampaignRelation]) -> Self {
        relations.iter().copied().collect()
    }

    pub fn contains(&self, relation: CampaignRelation) -> bool {
        self.0.contains(&relation)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<CampaignRelation> for Relations {
    fn from_iter<I: IntoIterator<Item = CampaignRelation>>(iter: I) -> Self {
        let mut set = BTreeSet::new();
        for r in iter {
            if r == CampaignRelation::CandidateUsers {
                set.insert(CampaignRelation::Candidates);
            }
            set.insert(r);
        }
        Self(set)
    }
}

/// Which campaigns a list read should return.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CampaignFilter {
    All,
    Ids(Vec<Uuid>),
    Owner(Uuid),
}

impl CampaignFilter {
    pub fn matches(&self, c: &campaign::Model) -> bool {
        match self {
            CampaignFilter::All => true,
            CampaignFilter::Ids(ids) => ids.contains(&c.id),
            CampaignFilter::Owner(uid) => c.user_id == *uid,
        }
    }
}

/// A candidate with its optionally populated user.
#[derive(Clone, Debug, Serialize)]
pub struct CandidateView {
    #[serde(flatten)]
    pub candidate: candidate::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<user::Model>,
}

/// A campaign plus whichever relations were requested. `None` means "not loaded".
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignView {
    #[serde(flatten)]
    pub campaign: campaign::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<user::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<CandidateView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<group::Model>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_users: Option<Vec<vote_user::Model>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_candidates: Option<Vec<vote_candidate::Model>>,
}

impl CampaignView {
    pub fn bare(campaign: campaign::Model) -> Self {
        Self { campaign, user: None, candidates: None, groups: None, vote_users: None, vote_candidates: None }
    }

    pub fn id(&self) -> Uuid {
        self.campaign.id
    }
}

/// A user resolved as campaign owner, with the roles a creation policy may inspect.
#[derive(Clone, Debug)]
pub struct Owner {
    pub user: user::Model,
    pub roles: Vec<role::Model>,
}

impl Owner {
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name == name)
    }
}

/// A group with every campaign linked to it.
#[derive(Clone, Debug)]
pub struct GroupWithCampaigns {
    pub group: group::Model,
    pub campaigns: Vec<campaign::Model>,
}

/// Rows removed by a cascading campaign delete.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeletedCounts {
    pub vote_users: u64,
    pub vote_candidates: u64,
    pub candidates: u64,
    pub campaigns: u64,
}

/// Confirmation returned once a delete completed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub message: String,
    pub deleted: u64,
}

/// Flatten the campaigns of every group and keep the first occurrence of each id.
pub fn dedup_campaigns(groups: Vec<GroupWithCampaigns>) -> Vec<campaign::Model> {
    let mut seen = HashSet::new();
    groups
        .into_iter()
        .flat_map(|g| g.campaigns)
        .filter(|c| seen.insert(c.id))
        .collect()
}

/// Sort `items` to follow the order of `ids`; items not listed go last.
pub fn order_by_ids<T>(items: &mut [T], ids: &[Uuid], key: impl Fn(&T) -> Uuid) {
    items.sort_by_key(|item| {
        let id = key(item);
        ids.iter().position(|x| *x == id).unwrap_or(usize::MAX)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn campaign(name: &str) -> campaign::Model {
        let now = Utc::now().into();
        campaign::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            start_date: None,
            end_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn group(name: &str, campaigns: Vec<campaign::Model>) -> GroupWithCampaigns {
        GroupWithCampaigns {
            group: group::Model { id: Uuid::new_v4(), name: name.into(), created_at: Utc::now().into() },
            campaigns,
        }
    }

    #[test]
    fn dedup_keeps_first_seen_order_across_groups() {
        let a = campaign("a");
        let b = campaign("b");
        let c = campaign("c");
        let groups = vec![
            group("g1", vec![b.clone(), a.clone()]),
            group("g2", vec![a.clone(), c.clone(), b.clone()]),
        ];
        let ids: Vec<Uuid> = dedup_campaigns(groups).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![b.id, a.id, c.id]);
    }

    #[test]
    fn dedup_of_nothing_is_empty() {
        assert!(dedup_campaigns(vec![]).is_empty());
        assert!(dedup_campaigns(vec![group("empty", vec![])]).is_empty());
    }

    #[test]
    fn candidate_users_implies_candidates() {
        let r = Relations::of(&[CampaignRelation::User, CampaignRelation::CandidateUsers]);
        assert!(r.contains(CampaignRelation::Candidates));
        assert!(r.contains(CampaignRelation::User));
        assert!(!r.contains(CampaignRelation::Groups));
        assert!(Relations::none().is_empty());
    }

    #[test]
    fn update_payload_distinguishes_null_from_absent() {
        let input: UpdateCampaignInput =
            serde_json::from_str(r#"{"name":"Renamed","description":null}"#).unwrap();
        assert_eq!(input.name.as_deref(), Some("Renamed"));
        assert_eq!(input.description, Some(None));
        assert_eq!(input.start_date, None);

        let mut c = campaign("before");
        c.description = Some("old".into());
        let end = c.end_date;
        input.apply_scalars(&mut c);
        assert_eq!(c.name, "Renamed");
        assert!(c.description.is_none());
        assert_eq!(c.end_date, end);
    }

    #[test]
    fn create_payload_is_camel_case() {
        let uid = Uuid::new_v4();
        let gid = Uuid::new_v4();
        let raw = format!(r#"{{"userId":"{uid}","name":"Vote","groups":[{{"id":"{gid}"}}]}}"#);
        let input: CreateCampaignInput = serde_json::from_str(&raw).unwrap();
        assert_eq!(input.user_id, uid);
        assert_eq!(input.groups, Some(vec![GroupRef { id: gid }]));
        assert!(input.start_date.is_none());
    }

    #[test]
    fn view_omits_unloaded_relations() {
        let view = CampaignView::bare(campaign("solo"));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], "solo");
        assert!(json.get("userId").is_some());
        assert!(json.get("user").is_none());
        assert!(json.get("candidates").is_none());
    }

    #[test]
    fn order_by_ids_follows_request() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut items = vec![a, b, c];
        order_by_ids(&mut items, &[c, a], |x| *x);
        assert_eq!(items, vec![c, a, b]);
    }
}
