//! Treatshelf Core Library
//!
//! The treat record, the store interface, and its two backends.

pub mod config;
pub mod error;
pub mod ports;
pub mod store;
pub mod types;

pub use config::{Backend, FirestoreConfig, StoreConfig};
pub use error::{DocumentError, ErrorKind, Result, StoreError};
pub use ports::TreatStore;
pub use store::{open_store, FirestoreStore, MemoryStore};
pub use types::Treat;
