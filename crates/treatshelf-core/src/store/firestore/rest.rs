//! Firestore REST client
//!
//! Talks to `projects/{project}/databases/{database}/documents` on the public
//! endpoint or on an emulator. Only flat string fields are supported.

use crate::config::FirestoreConfig;
use crate::error::DocumentError;
use crate::ports::{DocResult, Document, DocumentClient, DocumentPage, Fields, PageQuery};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

pub struct FirestoreRestClient {
    http: Client,
    /// `.../v1/projects/{project}/databases/{database}`
    database_url: Url,
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct WireDocument {
    name: String,
    #[serde(default)]
    fields: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireListResponse {
    #[serde(default)]
    documents: Vec<WireDocument>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct WireTransaction {
    transaction: String,
}

#[derive(Deserialize)]
struct WireErrorBody {
    error: WireError,
}

#[derive(Deserialize)]
struct WireError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl FirestoreRestClient {
    pub fn new(config: &FirestoreConfig) -> DocResult<Self> {
        let project = config
            .project_id
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| DocumentError::Config("project id is not set".to_string()))?;

        let mut database_url = Url::parse(&config.base_url())
            .map_err(|e| DocumentError::Config(format!("{}: {}", config.base_url(), e)))?;
        database_url
            .path_segments_mut()
            .map_err(|_| DocumentError::Config(config.base_url()))?
            .pop_if_empty()
            .extend(["projects", project, "databases", config.database.as_str()]);

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            database_url,
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.database_url.clone();
        // database_url was validated as a base URL in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    fn document_url(&self, collection: &str, id: &str) -> Url {
        self.url(&["documents", collection, id])
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("firestore: {} {}", method, url);
        let builder = self.http.request(method, url);
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> DocResult<Response> {
        let response = builder.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let code = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let (status, message) = match serde_json::from_str::<WireErrorBody>(&body) {
            Ok(parsed) => (parsed.error.status, parsed.error.message),
            Err(_) => (String::new(), body),
        };
        Err(DocumentError::Status {
            code,
            status,
            message,
        })
    }
}

#[async_trait]
impl DocumentClient for FirestoreRestClient {
    async fn begin_transaction(&self) -> DocResult<String> {
        let url = self.url(&["documents:beginTransaction"]);
        let response = Self::send(
            self.request(Method::POST, url)
                .json(&json!({ "options": { "readOnly": {} } })),
        )
        .await?;
        let wire: WireTransaction = response.json().await?;
        Ok(wire.transaction)
    }

    async fn rollback(&self, transaction: &str) -> DocResult<()> {
        let url = self.url(&["documents:rollback"]);
        Self::send(
            self.request(Method::POST, url)
                .json(&json!({ "transaction": transaction })),
        )
        .await?;
        Ok(())
    }

    async fn create(&self, collection: &str, fields: &Fields) -> DocResult<Document> {
        let url = self.url(&["documents", collection]);
        let response = Self::send(
            self.request(Method::POST, url)
                .json(&json!({ "fields": encode_fields(fields) })),
        )
        .await?;
        decode_document(response.json().await?)
    }

    async fn get(&self, collection: &str, id: &str) -> DocResult<Document> {
        let url = self.document_url(collection, id);
        let response = Self::send(self.request(Method::GET, url)).await?;
        decode_document(response.json().await?)
    }

    async fn overwrite_existing(
        &self,
        collection: &str,
        id: &str,
        fields: &Fields,
    ) -> DocResult<()> {
        let url = self.document_url(collection, id);
        Self::send(
            self.request(Method::PATCH, url)
                .query(&[("currentDocument.exists", "true")])
                .json(&json!({ "fields": encode_fields(fields) })),
        )
        .await?;
        Ok(())
    }

    async fn delete_existing(&self, collection: &str, id: &str) -> DocResult<()> {
        let url = self.document_url(collection, id);
        Self::send(
            self.request(Method::DELETE, url)
                .query(&[("currentDocument.exists", "true")]),
        )
        .await?;
        Ok(())
    }

    async fn list_page(&self, collection: &str, query: &PageQuery) -> DocResult<DocumentPage> {
        let url = self.url(&["documents", collection]);
        let mut params = vec![
            ("orderBy", query.order_by.clone()),
            ("pageSize", query.page_size.to_string()),
        ];
        if let Some(token) = &query.page_token {
            params.push(("pageToken", token.clone()));
        }

        let response = Self::send(self.request(Method::GET, url).query(&params)).await?;
        let wire: WireListResponse = response.json().await?;

        let documents = wire
            .documents
            .into_iter()
            .map(decode_document)
            .collect::<DocResult<Vec<_>>>()?;
        Ok(DocumentPage {
            documents,
            next_page_token: wire.next_page_token.filter(|t| !t.is_empty()),
        })
    }
}

fn encode_fields(fields: &Fields) -> Value {
    let encoded: serde_json::Map<String, Value> = fields
        .iter()
        .map(|(key, value)| (key.clone(), json!({ "stringValue": value })))
        .collect();
    Value::Object(encoded)
}

fn decode_document(wire: WireDocument) -> DocResult<Document> {
    let id = wire
        .name
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| DocumentError::Decode(format!("bad document name {:?}", wire.name)))?
        .to_string();

    let mut fields = Fields::new();
    for (key, value) in wire.fields {
        let decoded = if let Some(s) = value.get("stringValue").and_then(Value::as_str) {
            s.to_string()
        } else if value.get("nullValue").is_some() {
            String::new()
        } else {
            return Err(DocumentError::Decode(format!(
                "field {:?} of {} is not a string: {}",
                key, id, value
            )));
        };
        fields.insert(key, decoded);
    }

    Ok(Document { id, fields })
}
