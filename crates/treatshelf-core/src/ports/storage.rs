//! Storage traits for persistence

use crate::types::Treat;
use crate::Result;
use async_trait::async_trait;

/// Treat store, shared by every backend.
///
/// Listing is ordered by title ascending with ties broken by id ascending.
/// `update` and `delete` reject an empty id with `InvalidArgument` and a
/// missing id with `NotFound`, whatever the backend.
///
/// Operations are cancelled by dropping their future; backends that talk to
/// the network abort the in-flight request when that happens.
#[async_trait]
pub trait TreatStore: Send + Sync {
    /// List every treat, ordered by title.
    async fn list(&self) -> Result<Vec<Treat>>;

    /// Retrieve a treat by its ID.
    async fn get(&self, id: &str) -> Result<Treat>;

    /// Save a treat, assigning it a new ID. Any ID already on `treat` is ignored.
    async fn add(&self, treat: Treat) -> Result<String>;

    /// Replace the stored treat with the same ID.
    async fn update(&self, treat: Treat) -> Result<()>;

    /// Remove a treat by its ID.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Release backend resources.
    async fn close(&self) -> Result<()>;
}
