use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use service::campaign::domain::{CampaignView, CreateCampaignInput, DeleteOutcome, UpdateCampaignInput};

use super::AppState;
use crate::errors::JsonApiError;

type ApiResult<T> = Result<T, JsonApiError>;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupIdsInput {
    pub group_ids: Vec<Uuid>,
}

/// `ids` stays optional so a missing key is reported like an empty list.
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteCampaignsInput {
    #[serde(default)]
    pub ids: Option<Vec<Uuid>>,
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateCampaignInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CampaignView>)> {
    let Json(input) = payload?;
    let created = state.campaigns.create_campaign(input).await?;
    info!(id = %created.id(), "campaign_create_request_ok");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<CampaignView>>> {
    Ok(Json(state.campaigns.find_all().await?))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<CampaignView>> {
    let Path(id) = id?;
    Ok(Json(state.campaigns.find_one(id).await?))
}

pub async fn list_by_user(
    State(state): State<AppState>,
    user_id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Vec<CampaignView>>> {
    let Path(user_id) = user_id?;
    Ok(Json(state.campaigns.get_campaigns_by_user_id(user_id).await?))
}

pub async fn list_by_groups(
    State(state): State<AppState>,
    payload: Result<Json<GroupIdsInput>, JsonRejection>,
) -> ApiResult<Json<Vec<CampaignView>>> {
    let Json(input) = payload?;
    Ok(Json(state.campaigns.get_campaigns_by_groups(&input.group_ids).await?))
}

pub async fn delete_many(
    State(state): State<AppState>,
    payload: Result<Json<DeleteCampaignsInput>, JsonRejection>,
) -> ApiResult<Json<DeleteOutcome>> {
    let Json(input) = payload?;
    let ids = input.ids.unwrap_or_default();
    let outcome = state.campaigns.delete_campaigns(&ids).await?;
    Ok(Json(outcome))
}

pub async fn replace(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateCampaignInput>, JsonRejection>,
) -> ApiResult<Json<CampaignView>> {
    let Path(id) = id?;
    let Json(input) = payload?;
    Ok(Json(state.campaigns.update_campaign(id, input).await?))
}
