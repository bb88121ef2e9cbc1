//! Treat store backends
//!
//! `memory` keeps everything in process and is meant for development and
//! tests. `firestore` persists to Cloud Firestore.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use crate::config::{Backend, StoreConfig};
use crate::ports::TreatStore;
use crate::Result;
use std::sync::Arc;
use tracing::info;

/// Build the backend selected by `config`.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn TreatStore>> {
    info!("Opening {} treat store", config.backend);

    let store: Arc<dyn TreatStore> = match config.backend {
        Backend::Memory => Arc::new(MemoryStore::new()),
        Backend::Firestore => Arc::new(FirestoreStore::connect(&config.firestore).await?),
    };
    Ok(store)
}
