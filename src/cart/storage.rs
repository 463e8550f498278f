//! Cart persistence
//!
//! Carts are stored per browser session and restaurant slug, mirroring a
//! storefront that keeps one cart per restaurant in local storage.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::warn;
use uuid::Uuid;

use super::error::CartError;
use super::models::Cart;

/// Identifies one stored cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CartKey {
    session_id: String,
    restaurant_slug: String,
}

impl CartKey {
    /// Both parts are used as path segments, so only `[A-Za-z0-9_-]` is accepted.
    pub fn new(
        session_id: impl Into<String>,
        restaurant_slug: impl Into<String>,
    ) -> Result<Self, CartError> {
        let session_id = session_id.into();
        let restaurant_slug = restaurant_slug.into();
        for segment in [&session_id, &restaurant_slug] {
            if !is_valid_key_segment(segment) {
                return Err(CartError::InvalidKey(segment.clone()));
            }
        }
        Ok(Self {
            session_id,
            restaurant_slug,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn restaurant_slug(&self) -> &str {
        &self.restaurant_slug
    }

    /// Storage key, e.g. `3f9a.../cart_bella-napoli`.
    pub fn storage_key(&self) -> String {
        format!("{}/cart_{}", self.session_id, self.restaurant_slug)
    }
}

pub fn is_valid_key_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment.len() <= 128
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Load/save/remove for carts.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Returns the stored cart, or `None` when there is none.
    async fn load(&self, key: &CartKey) -> Result<Option<Cart>, CartError>;

    async fn save(&self, key: &CartKey, cart: &Cart) -> Result<(), CartError>;

    /// Removing a missing cart is not an error.
    async fn remove(&self, key: &CartKey) -> Result<(), CartError>;
}

// =============================================================================
// In-memory store
// =============================================================================

/// Carts held in memory, keyed by storage key.
#[derive(Default)]
pub struct MemoryCartStore {
    carts: DashMap<String, Cart>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn load(&self, key: &CartKey) -> Result<Option<Cart>, CartError> {
        Ok(self.carts.get(&key.storage_key()).map(|c| c.clone()))
    }

    async fn save(&self, key: &CartKey, cart: &Cart) -> Result<(), CartError> {
        self.carts.insert(key.storage_key(), cart.clone());
        Ok(())
    }

    async fn remove(&self, key: &CartKey) -> Result<(), CartError> {
        self.carts.remove(&key.storage_key());
        Ok(())
    }
}

// =============================================================================
// File store
// =============================================================================

/// One JSON document per cart under a root directory.
pub struct FileCartStore {
    root: PathBuf,
}

impl FileCartStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &CartKey) -> PathBuf {
        self.root.join(format!("{}.json", key.storage_key()))
    }
}

#[async_trait]
impl CartStore for FileCartStore {
    async fn load(&self, key: &CartKey) -> Result<Option<Cart>, CartError> {
        let path = self.path_for(key);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(cart) => Ok(Some(cart)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Discarding unreadable cart");
                Ok(None)
            }
        }
    }

    async fn save(&self, key: &CartKey, cart: &Cart) -> Result<(), CartError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write then rename so readers never see a partial document; each
        // write gets its own temp file so concurrent saves of one cart can't
        // interleave
        let tmp = path.with_extension(format!("{}.json.tmp", Uuid::new_v4().simple()));
        let written = match tokio::fs::write(&tmp, serde_json::to_vec(cart)?).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(path = %tmp.display(), error = %cleanup, "Failed to remove temp cart file");
                }
            }
            return Err(e.into());
        }
        Ok(())
    }

    async fn remove(&self, key: &CartKey) -> Result<(), CartError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
