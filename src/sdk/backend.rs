//! The seam between the application and the hosted data service.

use async_trait::async_trait;
use serde_json::Value;

use super::error::SdkError;
use super::query::Query;

/// Raw, untyped access to backend collections.
///
/// Implementations own id assignment and timestamps: `insert` sets `id` and
/// `created_at` when the record lacks them, `update` shallow-merges the patch
/// into the stored record and stamps `updated_at`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns the records matching `query`, sorted and limited.
    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<Value>, SdkError>;

    /// Stores a new record and returns it as persisted.
    async fn insert(&self, collection: &str, record: Value) -> Result<Value, SdkError>;

    /// Applies a partial update and returns the merged record.
    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<Value, SdkError>;
}
