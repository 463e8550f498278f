//! Typed facade over a [`Backend`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::backend::Backend;
use super::error::SdkError;
use super::query::QueryBuilder;

/// Cheaply cloneable handle used by every service to reach the data layer.
#[derive(Clone)]
pub struct Sdk {
    backend: Arc<dyn Backend>,
}

impl Sdk {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Starts a query over `collection`, yielding records of type `T`.
    pub fn query_builder<T: DeserializeOwned>(&self, collection: &str) -> QueryBuilder<T> {
        QueryBuilder::new(Arc::clone(&self.backend), collection)
    }

    /// Inserts `partial` and returns the stored record.
    pub async fn insert<T, P>(&self, collection: &str, partial: &P) -> Result<T, SdkError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let record = serde_json::to_value(partial)?;
        let stored = self.backend.insert(collection, record).await?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Applies `partial` to record `id` and returns the merged record.
    pub async fn update<T, P>(&self, collection: &str, id: &str, partial: &P) -> Result<T, SdkError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let patch = serde_json::to_value(partial)?;
        let stored = self.backend.update(collection, id, patch).await?;
        Ok(serde_json::from_value(stored)?)
    }
}
