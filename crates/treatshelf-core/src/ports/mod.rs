//! Port traits (interfaces) for dependency injection

pub mod document;
pub mod storage;

pub use document::{DocResult, Document, DocumentClient, DocumentPage, Fields, PageQuery};
pub use storage::TreatStore;
