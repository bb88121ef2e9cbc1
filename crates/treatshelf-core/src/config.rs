//! Store configuration
//!
//! The backend is chosen once, at construction time, from this configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DATABASE: &str = "(default)";
pub const DEFAULT_COLLECTION: &str = "treats";
pub const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com/v1";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Memory,
    Firestore,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Memory => write!(f, "memory"),
            Backend::Firestore => write!(f, "firestore"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,
    pub firestore: FirestoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirestoreConfig {
    pub project_id: Option<String>,
    pub database: String,
    pub collection: String,
    /// `host:port` of a local emulator. Takes precedence over `endpoint`.
    pub emulator_host: Option<String>,
    pub endpoint: String,
    /// OAuth2 bearer token sent with every request, if set.
    pub access_token: Option<String>,
    pub request_timeout_secs: u64,
    pub page_size: u32,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            emulator_host: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            access_token: None,
            request_timeout_secs: 30,
            page_size: 100,
        }
    }
}

impl FirestoreConfig {
    /// Base URL of the REST API, without the project path.
    pub fn base_url(&self) -> String {
        match &self.emulator_host {
            Some(host) if !host.is_empty() => format!("http://{}/v1", host),
            _ => self.endpoint.trim_end_matches('/').to_string(),
        }
    }
}
