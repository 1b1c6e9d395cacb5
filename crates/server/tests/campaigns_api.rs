use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, AppState};
use service::campaign::repository::mock::MockCampaignRepository;

struct TestApp {
    base_url: String,
    repo: Arc<MockCampaignRepository>,
}

/// Serve the router over the in-memory repository on an ephemeral port.
async fn start_server() -> anyhow::Result<TestApp> {
    let repo = Arc::new(MockCampaignRepository::default());
    let app = routes::build_router(AppState::new(repo.clone()), CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });
    Ok(TestApp { base_url: format!("http://{}", addr), repo })
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, body: Value) -> anyhow::Result<reqwest::Response> {
        Ok(reqwest::Client::new().post(self.url("/campaigns")).json(&body).send().await?)
    }
}

#[tokio::test]
async fn health_is_ok() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(app.url("/health")).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn create_then_get_campaign() -> anyhow::Result<()> {
    let app = start_server().await?;
    let owner = app.repo.add_user("Ada");
    let group = app.repo.add_group("Staff");

    let res = app
        .create(json!({
            "userId": owner.id,
            "name": "Board election",
            "description": "annual",
            "startDate": "2025-03-01T09:00:00+00:00",
            "endDate": "2025-03-08T18:00:00+00:00",
            "groups": [{ "id": group.id }]
        }))
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created: Value = res.json().await?;
    assert_eq!(created["name"], "Board election");
    assert_eq!(created["user"]["id"], json!(owner.id));
    assert_eq!(created["groups"][0]["id"], json!(group.id));
    let id: Uuid = serde_json::from_value(created["id"].clone())?;

    let runner = app.repo.add_user("Grace");
    app.repo.add_candidate(id, Some(runner.id), "Grace");

    let res = reqwest::get(app.url(&format!("/campaigns/{}", id))).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let fetched: Value = res.json().await?;
    assert_eq!(fetched["userId"], json!(owner.id));
    assert_eq!(fetched["candidates"][0]["user"]["id"], json!(runner.id));
    Ok(())
}

#[tokio::test]
async fn create_failures_map_to_statuses() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = app.create(json!({ "userId": Uuid::new_v4(), "name": "Orphan" })).await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Not Found");

    let owner = app.repo.add_user("Ada");
    let res = app
        .create(json!({ "userId": owner.id, "name": "Bad groups", "groups": [{ "id": Uuid::new_v4() }] }))
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = reqwest::Client::new()
        .post(app.url("/campaigns"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(app.repo.campaign_count(), 0);
    Ok(())
}

#[tokio::test]
async fn get_unknown_and_malformed_ids() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(app.url(&format!("/campaigns/{}", Uuid::new_v4()))).await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = reqwest::get(app.url("/campaigns/not-a-uuid")).await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Invalid Path");
    Ok(())
}

#[tokio::test]
async fn list_by_user_and_groups() -> anyhow::Result<()> {
    let app = start_server().await?;
    let owner = app.repo.add_user("Ada");
    let g1 = app.repo.add_group("A");
    let g2 = app.repo.add_group("B");
    app.create(json!({ "userId": owner.id, "name": "Both", "groups": [{ "id": g1.id }, { "id": g2.id }] }))
        .await?;
    app.create(json!({ "userId": owner.id, "name": "OnlyB", "groups": [{ "id": g2.id }] })).await?;

    let all: Vec<Value> = reqwest::get(app.url("/campaigns")).await?.json().await?;
    assert_eq!(all.len(), 2);

    let owned: Vec<Value> = reqwest::get(app.url(&format!("/campaigns/user/{}", owner.id))).await?.json().await?;
    assert_eq!(owned.len(), 2);
    assert!(owned.iter().all(|c| c["candidates"].is_array()));

    let res = reqwest::Client::new()
        .post(app.url("/campaigns/groups"))
        .json(&json!({ "groupIds": [g1.id, g2.id] }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let names: Vec<String> = res
        .json::<Vec<Value>>()
        .await?
        .iter()
        .map(|c| c["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["Both", "OnlyB"]);
    Ok(())
}

#[tokio::test]
async fn patch_updates_present_fields() -> anyhow::Result<()> {
    let app = start_server().await?;
    let owner = app.repo.add_user("Ada");
    let created: Value = app
        .create(json!({ "userId": owner.id, "name": "Before", "description": "keep me" }))
        .await?
        .json()
        .await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let res = reqwest::Client::new()
        .patch(app.url(&format!("/campaigns/{}", id)))
        .json(&json!({ "name": "After" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["name"], "After");
    assert_eq!(updated["description"], "keep me");

    let res = reqwest::Client::new()
        .patch(app.url(&format!("/campaigns/{}", Uuid::new_v4())))
        .json(&json!({ "name": "Nobody" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_many_statuses() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();

    for body in [json!({}), json!({ "ids": [] }), json!({ "ids": "nope" })] {
        let res = client.delete(app.url("/campaigns")).json(&body).send().await?;
        assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST, "body: {}", body);
    }

    let res = client.delete(app.url("/campaigns")).json(&json!({ "ids": [Uuid::new_v4()] })).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let owner = app.repo.add_user("Ada");
    let created: Value = app.create(json!({ "userId": owner.id, "name": "Gone" })).await?.json().await?;
    let id: Uuid = serde_json::from_value(created["id"].clone())?;
    let voter = app.repo.add_user("Voter");
    app.repo.add_vote_user(id, voter.id);

    let res = client.delete(app.url("/campaigns")).json(&json!({ "ids": [id] })).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert!(body["message"].is_string());
    assert_eq!(body["deleted"], 1);
    assert_eq!(app.repo.dependents_of(id), (0, 0, 0));

    app.repo.fail_deletes(true);
    let again: Value = app.create(json!({ "userId": owner.id, "name": "Stuck" })).await?.json().await?;
    let res = client.delete(app.url("/campaigns")).json(&json!({ "ids": [again["id"]] })).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}
