//! Cloud Firestore treat store
//!
//! Translates [`TreatStore`] calls into document operations. Every operation
//! is a single attempt; failures are returned as-is, wrapped with the
//! operation name and treat ID.

pub mod cursor;
pub mod rest;

pub use cursor::DocumentCursor;
pub use rest::FirestoreRestClient;

use crate::config::FirestoreConfig;
use crate::error::{DocumentError, Result, StoreError};
use crate::ports::{Document, DocumentClient, Fields, TreatStore};
use crate::types::Treat;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

const FIELD_TITLE: &str = "title";
const FIELD_AUTHOR: &str = "author";
const FIELD_PUBLISHED_DATE: &str = "publishedDate";
const FIELD_IMAGE_URL: &str = "imageURL";
const FIELD_DESCRIPTION: &str = "description";

/// Treat store persisted to a Firestore collection.
pub struct FirestoreStore<C = FirestoreRestClient> {
    client: C,
    collection: String,
    page_size: u32,
    closed: AtomicBool,
}

impl FirestoreStore<FirestoreRestClient> {
    /// Connect to Firestore over REST and verify the service is reachable.
    pub async fn connect(config: &FirestoreConfig) -> Result<Self> {
        let client =
            FirestoreRestClient::new(config).map_err(|source| StoreError::Connection { source })?;
        Self::with_client(client, &config.collection, config.page_size).await
    }
}

impl<C: DocumentClient> FirestoreStore<C> {
    /// Wrap an existing client. Runs an empty transaction first so that
    /// unreachable or unauthenticated backends fail here rather than on the
    /// first request.
    pub async fn with_client(client: C, collection: &str, page_size: u32) -> Result<Self> {
        let transaction = client
            .begin_transaction()
            .await
            .map_err(|source| StoreError::Connection { source })?;
        client
            .rollback(&transaction)
            .await
            .map_err(|source| StoreError::Connection { source })?;

        info!("Connected to document store, collection {:?}", collection);

        Ok(Self {
            client,
            collection: collection.to_string(),
            page_size,
            closed: AtomicBool::new(false),
        })
    }

    fn ensure_open(&self, op: &'static str) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed { op });
        }
        Ok(())
    }
}

fn backend_error(op: &'static str, id: Option<&str>, source: DocumentError) -> StoreError {
    match id {
        Some(id) if source.is_not_found() => StoreError::not_found(op, id),
        _ => StoreError::Backend {
            op,
            id: id.map(str::to_string),
            source,
        },
    }
}

fn treat_to_fields(treat: &Treat) -> Fields {
    let mut fields = Fields::new();
    fields.insert(FIELD_TITLE.to_string(), treat.title.clone());
    fields.insert(FIELD_AUTHOR.to_string(), treat.author.clone());
    fields.insert(FIELD_PUBLISHED_DATE.to_string(), treat.published_date.clone());
    fields.insert(FIELD_IMAGE_URL.to_string(), treat.image_url.clone());
    fields.insert(FIELD_DESCRIPTION.to_string(), treat.description.clone());
    fields
}

fn treat_from_document(mut doc: Document) -> Treat {
    let mut take = |key: &str| doc.fields.remove(key).unwrap_or_default();
    Treat {
        title: take(FIELD_TITLE),
        author: take(FIELD_AUTHOR),
        published_date: take(FIELD_PUBLISHED_DATE),
        image_url: take(FIELD_IMAGE_URL),
        description: take(FIELD_DESCRIPTION),
        id: doc.id,
    }
}

#[async_trait]
impl<C: DocumentClient> TreatStore for FirestoreStore<C> {
    async fn list(&self) -> Result<Vec<Treat>> {
        self.ensure_open("list")?;

        let mut cursor =
            DocumentCursor::new(&self.client, &self.collection, FIELD_TITLE, self.page_size);
        let mut treats = Vec::new();

        // An early return drops the cursor, which stops it.
        while let Some(doc) = cursor
            .next()
            .await
            .map_err(|source| backend_error("list", None, source))?
        {
            let treat = treat_from_document(doc);
            debug!("Treat {:?} ID: {:?}", treat.title, treat.id);
            treats.push(treat);
        }
        cursor.stop();

        Ok(treats)
    }

    async fn get(&self, id: &str) -> Result<Treat> {
        self.ensure_open("get")?;
        if id.is_empty() {
            return Err(StoreError::not_found("get", id));
        }

        let doc = self
            .client
            .get(&self.collection, id)
            .await
            .map_err(|source| backend_error("get", Some(id), source))?;
        Ok(treat_from_document(doc))
    }

    async fn add(&self, treat: Treat) -> Result<String> {
        self.ensure_open("add")?;

        let doc = self
            .client
            .create(&self.collection, &treat_to_fields(&treat))
            .await
            .map_err(|source| backend_error("add", None, source))?;

        debug!("firestore store: added treat {}", doc.id);
        Ok(doc.id)
    }

    async fn update(&self, treat: Treat) -> Result<()> {
        self.ensure_open("update")?;
        if !treat.has_id() {
            return Err(StoreError::unassigned_id("update"));
        }

        self.client
            .overwrite_existing(&self.collection, &treat.id, &treat_to_fields(&treat))
            .await
            .map_err(|source| backend_error("update", Some(&treat.id), source))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.ensure_open("delete")?;
        if id.is_empty() {
            return Err(StoreError::unassigned_id("delete"));
        }

        self.client
            .delete_existing(&self.collection, id)
            .await
            .map_err(|source| backend_error("delete", Some(id), source))
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("Closed document store, collection {:?}", self.collection);
        }
        Ok(())
    }
}
