//! Errors surfaced by the backend client.

use thiserror::Error;

/// Failure talking to the backend data service.
#[derive(Debug, Error)]
pub enum SdkError {
    /// No record with this id exists in the collection.
    #[error("{collection} record {id} not found")]
    NotFound { collection: String, id: String },

    /// A record could not be converted to or from its typed form.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Records passed to `insert`/`update` must be JSON objects.
    #[error("expected a JSON object for {0}")]
    NotAnObject(String),

    /// Seed data could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend rejected or failed the request.
    #[error("backend error: {0}")]
    Backend(String),
}
