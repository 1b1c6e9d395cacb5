use crate::{campaign, campaign_group, candidate, group, role, user, vote_candidate, vote_user};
use sea_orm::{ColumnTrait, EntityTrait, ModelTrait, QueryFilter};
use anyhow::Result;
use uuid::Uuid;

use super::setup_test_db;

fn unique_email() -> String {
    format!("crud_{}@example.com", Uuid::new_v4())
}

/// Test user + role grant
#[tokio::test]
async fn test_user_roles() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let u = user::create(&db, "Role Holder", &unique_email()).await?;
    let r = role::create(&db, &format!("moderator_{}", Uuid::new_v4())).await?;
    role::grant(&db, u.id, r.id).await?;

    let roles = u.find_related(role::Entity).all(&db).await?;
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].id, r.id);

    user::Entity::delete_by_id(u.id).exec(&db).await?;
    role::Entity::delete_by_id(r.id).exec(&db).await?;
    Ok(())
}

/// Test campaign create, group links and overwrite
#[tokio::test]
async fn test_campaign_crud_with_groups() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let owner = user::create(&db, "Owner", &unique_email()).await?;
    let g1 = group::create(&db, "Faculty").await?;
    let g2 = group::create(&db, "Students").await?;

    let created = campaign::create(&db, campaign::NewCampaign {
        user_id: owner.id,
        name: "Board election".into(),
        description: Some("yearly".into()),
        start_date: None,
        end_date: None,
    }).await?;
    assert_eq!(created.user_id, owner.id);

    campaign_group::replace_for_campaign(&db, created.id, &[g1.id, g2.id]).await?;
    let groups = created.find_related(group::Entity).all(&db).await?;
    assert_eq!(groups.len(), 2);

    campaign_group::replace_for_campaign(&db, created.id, &[g2.id]).await?;
    let groups = created.find_related(group::Entity).all(&db).await?;
    assert_eq!(groups.iter().map(|g| g.id).collect::<Vec<_>>(), vec![g2.id]);

    let mut changed = created.clone();
    changed.name = "Board election (runoff)".into();
    changed.description = None;
    let updated = campaign::overwrite(&db, changed).await?;
    assert_eq!(updated.name, "Board election (runoff)");
    assert!(updated.description.is_none());
    assert_eq!(updated.created_at, created.created_at);

    campaign::Entity::delete_by_id(created.id).exec(&db).await?;
    // join rows follow the campaign, groups stay
    let links = campaign_group::Entity::find()
        .filter(campaign_group::Column::CampaignId.eq(created.id))
        .all(&db)
        .await?;
    assert!(links.is_empty());
    assert!(group::Entity::find_by_id(g2.id).one(&db).await?.is_some());

    group::Entity::delete_by_id(g1.id).exec(&db).await?;
    group::Entity::delete_by_id(g2.id).exec(&db).await?;
    user::Entity::delete_by_id(owner.id).exec(&db).await?;
    Ok(())
}

/// Dependents restrict campaign deletion until removed explicitly
#[tokio::test]
async fn test_campaign_delete_restricted_by_dependents() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let owner = user::create(&db, "Owner", &unique_email()).await?;
    let voter = user::create(&db, "Voter", &unique_email()).await?;
    let c = campaign::create(&db, campaign::NewCampaign {
        user_id: owner.id,
        name: "Restricted".into(),
        description: None,
        start_date: None,
        end_date: None,
    }).await?;
    let cand = candidate::create(&db, c.id, Some(voter.id), "Alice").await?;
    let vu = vote_user::create(&db, c.id, voter.id).await?;
    let vc = vote_candidate::create(&db, c.id, cand.id).await?;

    assert!(campaign::Entity::delete_by_id(c.id).exec(&db).await.is_err());

    vote_user::Entity::delete_by_id(vu.id).exec(&db).await?;
    vote_candidate::Entity::delete_by_id(vc.id).exec(&db).await?;
    candidate::Entity::delete_by_id(cand.id).exec(&db).await?;
    campaign::Entity::delete_by_id(c.id).exec(&db).await?;

    user::Entity::delete_by_id(voter.id).exec(&db).await?;
    user::Entity::delete_by_id(owner.id).exec(&db).await?;
    Ok(())
}
