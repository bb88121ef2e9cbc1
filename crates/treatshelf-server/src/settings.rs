//! Server settings
//!
//! Built from defaults and `TREATSHELF_*` environment variables (nested keys
//! joined with `__`, e.g. `TREATSHELF_STORE__BACKEND=firestore`). `PORT`,
//! `GOOGLE_CLOUD_PROJECT` and `FIRESTORE_EMULATOR_HOST` are honored too.

use anyhow::{bail, Context, Result};
use config::{Config, Environment};
use serde::Deserialize;
use std::collections::HashMap;
use treatshelf_core::{Backend, StoreConfig};

const ENV_PREFIX: &str = "TREATSHELF";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    #[serde(default)]
    pub store: StoreConfig,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        Self::from_vars(std::env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let mut builder = Config::builder().set_default("bind_address", DEFAULT_BIND_ADDRESS)?;

        // Conventional variables sit below TREATSHELF_* in precedence.
        if let Some(project) = vars.get("GOOGLE_CLOUD_PROJECT") {
            builder = builder.set_default("store.firestore.project_id", project.as_str())?;
        }
        if let Some(host) = vars.get("FIRESTORE_EMULATOR_HOST") {
            builder = builder.set_default("store.firestore.emulator_host", host.as_str())?;
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            )
            .build()
            .context("Failed to read configuration")?;

        let mut config: ServerConfig = settings
            .try_deserialize()
            .context("Invalid configuration")?;

        if let Some(port) = vars.get("PORT").filter(|p| !p.is_empty()) {
            config.bind_address = with_port(&config.bind_address, port);
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.store.backend == Backend::Firestore {
            let has_project = self
                .store
                .firestore
                .project_id
                .as_deref()
                .map(|p| !p.is_empty())
                .unwrap_or(false);
            if !has_project {
                bail!(
                    "the firestore backend needs a project id \
                     (GOOGLE_CLOUD_PROJECT or {}_STORE__FIRESTORE__PROJECT_ID)",
                    ENV_PREFIX
                );
            }
        }
        Ok(())
    }
}

fn with_port(bind_address: &str, port: &str) -> String {
    let host = bind_address
        .rsplit_once(':')
        .map(|(host, _)| host)
        .unwrap_or(bind_address);
    format!("{}:{}", host, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_vars(HashMap::new()).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.store.backend, Backend::Memory);
        assert_eq!(config.store.firestore.collection, "treats");
    }

    #[test]
    fn test_port_overrides_bind_port() {
        let config = ServerConfig::from_vars(vars(&[("PORT", "9000")])).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:9000");
    }

    #[test]
    fn test_firestore_from_environment() {
        let config = ServerConfig::from_vars(vars(&[
            ("TREATSHELF_STORE__BACKEND", "firestore"),
            ("GOOGLE_CLOUD_PROJECT", "bakery-prod"),
            ("FIRESTORE_EMULATOR_HOST", "localhost:8681"),
            ("TREATSHELF_STORE__FIRESTORE__PAGE_SIZE", "25"),
            ("TREATSHELF_STORE__FIRESTORE__COLLECTION", "desserts"),
        ]))
        .unwrap();

        assert_eq!(config.store.backend, Backend::Firestore);
        let firestore = &config.store.firestore;
        assert_eq!(firestore.project_id.as_deref(), Some("bakery-prod"));
        assert_eq!(firestore.emulator_host.as_deref(), Some("localhost:8681"));
        assert_eq!(firestore.page_size, 25);
        assert_eq!(firestore.collection, "desserts");
        assert_eq!(firestore.database, "(default)");
    }

    #[test]
    fn test_prefixed_project_wins() {
        let config = ServerConfig::from_vars(vars(&[
            ("GOOGLE_CLOUD_PROJECT", "from-gcp"),
            ("TREATSHELF_STORE__FIRESTORE__PROJECT_ID", "explicit"),
        ]))
        .unwrap();
        assert_eq!(config.store.firestore.project_id.as_deref(), Some("explicit"));
    }

    #[test]
    fn test_firestore_requires_project() {
        let err = ServerConfig::from_vars(vars(&[("TREATSHELF_STORE__BACKEND", "firestore")]))
            .unwrap_err();
        assert!(err.to_string().contains("project id"));
    }
}
