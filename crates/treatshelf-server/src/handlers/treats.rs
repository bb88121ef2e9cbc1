//! Treat handlers

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use treatshelf_core::Treat;

#[derive(Debug, Serialize)]
pub struct TreatListResponse {
    treats: Vec<Treat>,
}

#[derive(Debug, Serialize)]
pub struct TreatResponse {
    treat: Treat,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    id: String,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<TreatListResponse>, ApiError> {
    let treats = state.store.list().await?;
    Ok(Json(TreatListResponse { treats }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TreatResponse>, ApiError> {
    let treat = state.store.get(&id).await?;
    Ok(Json(TreatResponse { treat }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(treat): Json<Treat>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.store.add(treat).await?;
    tracing::info!("Created treat {}", id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/treats/{}", id))],
        Json(CreatedResponse { id }),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut treat): Json<Treat>,
) -> Result<StatusCode, ApiError> {
    // The path is authoritative; an id in the body is ignored.
    treat.id = id;
    state.store.update(treat).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(&id).await?;
    tracing::info!("Deleted treat {}", id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use treatshelf_core::{MemoryStore, TreatStore};

    fn app_with(store: Arc<dyn TreatStore>) -> Router {
        crate::app(AppState { store })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_create_then_list_sorted() {
        let app = app_with(Arc::new(MemoryStore::new()));

        let (status, body) = send(&app, "POST", "/treats", Some(json!({ "title": "Zeta" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], "1");

        send(&app, "POST", "/treats", Some(json!({ "title": "Alpha", "id": "99" }))).await;

        let (status, body) = send(&app, "GET", "/treats", None).await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = body["treats"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Alpha", "Zeta"]);
        assert_eq!(body["treats"][0]["id"], "2");
    }

    #[tokio::test]
    async fn test_get_update_delete() {
        let app = app_with(Arc::new(MemoryStore::new()));
        send(&app, "POST", "/treats", Some(json!({ "title": "Flan", "author": "Rosa" }))).await;

        let (status, body) = send(&app, "GET", "/treats/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["treat"]["author"], "Rosa");

        let (status, _) = send(
            &app,
            "PUT",
            "/treats/1",
            Some(json!({ "title": "Flan", "author": "Rosa", "imageURL": "https://example.com/f.jpg" })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, "GET", "/treats/1", None).await;
        assert_eq!(body["treat"]["imageURL"], "https://example.com/f.jpg");

        let (status, _) = send(&app, "DELETE", "/treats/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "GET", "/treats/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_missing_ids_map_to_not_found() {
        let app = app_with(Arc::new(MemoryStore::new()));

        let (status, _) = send(&app, "PUT", "/treats/7", Some(json!({ "title": "Ghost" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", "/treats/7", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_closed_store_is_unavailable() {
        let store: Arc<dyn TreatStore> = Arc::new(MemoryStore::new());
        store.close().await.unwrap();
        let app = app_with(store);

        let (status, body) = send(&app, "POST", "/treats", Some(json!({ "title": "Late" }))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("closed"));
    }

    #[tokio::test]
    async fn test_health_and_root_redirect() {
        let app = app_with(Arc::new(MemoryStore::new()));

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/treats");
    }
}
