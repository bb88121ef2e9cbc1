//! In-memory treat store
//!
//! Every operation takes the same mutex for its whole duration. Nothing here
//! awaits while the lock is held, so a plain `std::sync::Mutex` is enough.

use crate::error::{Result, StoreError};
use crate::ports::TreatStore;
use crate::types::Treat;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Simple in-memory persistence layer for treats.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

struct Inner {
    /// Next ID to assign. Never decremented, so IDs are not reused.
    next_id: u64,
    /// Maps treat ID to treat. `None` once the store has been closed.
    treats: Option<HashMap<String, Treat>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                treats: Some(HashMap::new()),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The map only holds plain data, a panic elsewhere cannot leave it half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TreatStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Treat>> {
        let inner = self.lock();

        let mut treats: Vec<Treat> = inner
            .treats
            .as_ref()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        treats.sort_by(Treat::listing_order);

        Ok(treats)
    }

    async fn get(&self, id: &str) -> Result<Treat> {
        let inner = self.lock();

        inner
            .treats
            .as_ref()
            .and_then(|map| map.get(id))
            .cloned()
            .ok_or_else(|| StoreError::not_found("get", id))
    }

    async fn add(&self, mut treat: Treat) -> Result<String> {
        let mut inner = self.lock();

        let id = inner.next_id.to_string();
        let treats = inner
            .treats
            .as_mut()
            .ok_or(StoreError::Closed { op: "add" })?;

        treat.id = id.clone();
        treats.insert(id.clone(), treat);
        inner.next_id += 1;

        debug!("memory store: added treat {}", id);
        Ok(id)
    }

    async fn update(&self, treat: Treat) -> Result<()> {
        if !treat.has_id() {
            return Err(StoreError::unassigned_id("update"));
        }

        let mut inner = self.lock();

        match inner.treats.as_mut().and_then(|map| map.get_mut(&treat.id)) {
            Some(slot) => {
                debug!("memory store: updated treat {}", treat.id);
                *slot = treat;
                Ok(())
            }
            None => Err(StoreError::not_found("update", &treat.id)),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(StoreError::unassigned_id("delete"));
        }

        let mut inner = self.lock();

        match inner.treats.as_mut().and_then(|map| map.remove(id)) {
            Some(_) => {
                debug!("memory store: deleted treat {}", id);
                Ok(())
            }
            None => Err(StoreError::not_found("delete", id)),
        }
    }

    async fn close(&self) -> Result<()> {
        let mut inner = self.lock();
        inner.treats = None;
        Ok(())
    }
}
