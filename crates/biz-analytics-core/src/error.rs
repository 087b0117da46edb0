use thiserror::Error;

#[derive(Debug, Error)]
pub enum BizAnalyticsError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for BizAnalyticsError {
    fn from(e: serde_json::Error) -> Self {
        BizAnalyticsError::SerializationError(e.to_string())
    }
}
