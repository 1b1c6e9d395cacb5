use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::campaign::{CampaignRepository, CampaignService};

pub mod campaigns;

/// Shared handler state. The repository is type-erased so the same router
/// serves the SeaORM store in production and the in-memory store in tests.
#[derive(Clone)]
pub struct AppState {
    pub campaigns: Arc<CampaignService<dyn CampaignRepository>>,
}

impl AppState {
    pub fn new(repo: Arc<dyn CampaignRepository>) -> Self {
        Self { campaigns: Arc::new(CampaignService::new(repo)) }
    }
}

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let campaign_routes = Router::new()
        .route(
            "/campaigns",
            post(campaigns::create).get(campaigns::list).delete(campaigns::delete_many),
        )
        .route("/campaigns/groups", post(campaigns::list_by_groups))
        .route("/campaigns/user/:user_id", get(campaigns::list_by_user))
        .route("/campaigns/:id", get(campaigns::get).patch(campaigns::replace));

    Router::new()
        .route("/health", get(health))
        .merge(campaign_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
