//! Document database port
//!
//! The managed store is written against this trait so the wire client can be
//! swapped (REST, emulator, in-process fake).

use crate::error::DocumentError;
use async_trait::async_trait;
use std::collections::BTreeMap;

pub type DocResult<T> = std::result::Result<T, DocumentError>;

/// Flat string fields of a document.
pub type Fields = BTreeMap<String, String>;

/// A stored document. `id` is the server-assigned identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// One page request of an ordered collection listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub order_by: String,
    pub page_size: u32,
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentPage {
    pub documents: Vec<Document>,
    /// `None` once the listing is exhausted.
    pub next_page_token: Option<String>,
}

#[async_trait]
pub trait DocumentClient: Send + Sync {
    /// Open a transaction and return its opaque handle.
    async fn begin_transaction(&self) -> DocResult<String>;

    async fn rollback(&self, transaction: &str) -> DocResult<()>;

    /// Create a document whose identity is chosen by the server.
    async fn create(&self, collection: &str, fields: &Fields) -> DocResult<Document>;

    async fn get(&self, collection: &str, id: &str) -> DocResult<Document>;

    /// Overwrite every field of an existing document. Fails with a not-found
    /// status when the document does not exist.
    async fn overwrite_existing(&self, collection: &str, id: &str, fields: &Fields)
        -> DocResult<()>;

    /// Delete an existing document. Fails with a not-found status when the
    /// document does not exist.
    async fn delete_existing(&self, collection: &str, id: &str) -> DocResult<()>;

    async fn list_page(&self, collection: &str, query: &PageQuery) -> DocResult<DocumentPage>;
}
