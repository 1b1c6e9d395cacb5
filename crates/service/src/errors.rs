use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
    #[error("failed to delete campaigns with ids {}: {cause}", join_ids(.ids))]
    Internal { ids: Vec<Uuid>, cause: String },
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn db(e: impl ToString) -> Self { Self::Db(e.to_string()) }

    /// Wrap a failure of the multi-step delete together with the ids it was working on.
    pub fn internal(ids: &[Uuid], cause: impl ToString) -> Self {
        Self::Internal { ids: ids.to_vec(), cause: cause.to_string() }
    }
}

fn join_ids(ids: &[Uuid]) -> String {
    ids.iter().map(Uuid::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_lists_every_id() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let msg = ServiceError::internal(&[a, b], "connection reset").to_string();
        assert!(msg.contains(&a.to_string()));
        assert!(msg.contains(&b.to_string()));
        assert!(msg.ends_with("connection reset"));
    }
}
