//! Treat record

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A catalog entry.
///
/// `id` is empty until the record is first persisted; the store that accepts
/// it assigns the id and it never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Treat {
    pub id: String,
    pub title: String,
    pub author: String,
    pub published_date: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub description: String,
}

impl Treat {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Listing order: title ascending, ties broken by id ascending.
    pub fn listing_order(a: &Treat, b: &Treat) -> Ordering {
        a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id))
    }
}
