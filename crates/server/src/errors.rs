use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use service::errors::ServiceError;

/// JSON error envelope: `{"error": <title>, "detail": <message|null>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: String,
    pub detail: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    detail: Option<&'a str>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &str, detail: Option<String>) -> Self {
        Self { status, title: title.to_string(), detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: &self.title, detail: self.detail.as_deref() };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::BadRequest(_) | ServiceError::Model(_) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Bad Request", Some(e.to_string()))
            }
            ServiceError::NotFound(_) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string())),
            ServiceError::Forbidden(_) => JsonApiError::new(StatusCode::FORBIDDEN, "Forbidden", Some(e.to_string())),
            ServiceError::Db(_) | ServiceError::Internal { .. } => {
                error!(err = %e, "campaign request failed");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string()))
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(e: JsonRejection) -> Self {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid Body", Some(e.body_text()))
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(e: PathRejection) -> Self {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid Path", Some(e.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::not_found("campaign"), StatusCode::NOT_FOUND),
            (ServiceError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ServiceError::db("boom"), StatusCode::INTERNAL_SERVER_ERROR),
            (ServiceError::internal(&[Uuid::new_v4()], "boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }

    #[test]
    fn model_validation_is_bad_request() {
        let err = ServiceError::from(models::errors::ModelError::Validation("campaign name required".into()));
        let api = JsonApiError::from(err);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert!(api.detail.unwrap().contains("campaign name required"));
    }
}
