//! Application State Management
//!
//! This module wires the configuration, the backend client and the cart
//! store into the state shared by every handler.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::cart::{CartStore, FileCartStore, MemoryCartStore};
use crate::config::Config;
use crate::sdk::{Backend, MemoryBackend, Sdk, SdkError};

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub sdk: Sdk,
    pub carts: Arc<dyn CartStore>,
}

impl AppState {
    /// Builds the state described by `config`.
    ///
    /// The backend is in-process, seeded from `SEED_FILE` or from a
    /// `data/seed.json` found next to the working directory.
    pub async fn new(config: Config) -> Result<Self, SdkError> {
        let seed_file = config.seed_file.clone().or_else(|| {
            let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Self::locate_seed_file(&current_dir)
        });

        let backend = match seed_file {
            Some(path) => MemoryBackend::from_seed_file(&path).await?,
            None => {
                warn!("No seed data found, starting with an empty backend");
                MemoryBackend::new()
            }
        };

        let carts: Arc<dyn CartStore> = match &config.cart_dir {
            Some(dir) => {
                info!(dir = %dir.display(), "Persisting carts to disk");
                Arc::new(FileCartStore::new(dir))
            }
            None => Arc::new(MemoryCartStore::new()),
        };

        Ok(Self::with_parts(config, Arc::new(backend), carts))
    }

    /// Assembles state from explicit parts.
    pub fn with_parts(config: Config, backend: Arc<dyn Backend>, carts: Arc<dyn CartStore>) -> Self {
        Self {
            config,
            sdk: Sdk::new(backend),
            carts,
        }
    }

    /// Looks for `data/seed.json` in the current directory, then its parent
    /// (when running from a subdirectory).
    fn locate_seed_file(current_dir: &Path) -> Option<PathBuf> {
        let candidates = std::iter::once(current_dir).chain(current_dir.parent());
        candidates
            .map(|dir| dir.join("data").join("seed.json"))
            .find(|path| path.exists())
    }
}
