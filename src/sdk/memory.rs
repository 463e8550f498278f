//! In-process backend for local runs and tests.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::{Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use super::backend::Backend;
use super::error::SdkError;
use super::query::Query;

/// Collections held in memory, keyed by collection name.
/// DashMap allows concurrent access without external Mutexes.
#[derive(Default)]
pub struct MemoryBackend {
    collections: DashMap<String, Vec<Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a seed file shaped as `{ "collection": [record, ...], ... }`.
    pub async fn from_seed_file(path: &Path) -> Result<Self, SdkError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let seed: Map<String, Value> = serde_json::from_str(&raw)?;
        let backend = Self::new();

        for (collection, records) in seed {
            let Value::Array(records) = records else {
                return Err(SdkError::NotAnObject(format!("seed collection {collection}")));
            };
            let count = records.len();
            for record in records {
                backend.insert_record(&collection, record)?;
            }
            debug!(collection = %collection, count, "Seeded collection");
        }

        info!(path = %path.display(), "Loaded seed data");
        Ok(backend)
    }

    /// Number of records currently stored in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |rows| rows.len())
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn insert_record(&self, collection: &str, record: Value) -> Result<Value, SdkError> {
        let Value::Object(mut fields) = record else {
            return Err(SdkError::NotAnObject(format!("insert into {collection}")));
        };

        if fields.get("id").map_or(true, Value::is_null) {
            fields.insert("id".into(), Value::String(Uuid::new_v4().simple().to_string()));
        }
        if fields.get("created_at").map_or(true, Value::is_null) {
            fields.insert("created_at".into(), Value::String(Utc::now().to_rfc3339()));
        }

        let stored = Value::Object(fields);
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<Value>, SdkError> {
        Ok(self
            .collections
            .get(collection)
            .map(|rows| query.apply(rows.iter()))
            .unwrap_or_default())
    }

    async fn insert(&self, collection: &str, record: Value) -> Result<Value, SdkError> {
        self.insert_record(collection, record)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<Value, SdkError> {
        let Value::Object(patch) = patch else {
            return Err(SdkError::NotAnObject(format!("update of {collection}/{id}")));
        };
        let not_found = || SdkError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        };

        let mut rows = self.collections.get_mut(collection).ok_or_else(not_found)?;
        let fields = rows
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|fields| fields.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(not_found)?;

        for (key, value) in patch {
            if key != "id" {
                fields.insert(key, value);
            }
        }
        fields.insert("updated_at".into(), Value::String(Utc::now().to_rfc3339()));

        Ok(Value::Object(fields.clone()))
    }
}
