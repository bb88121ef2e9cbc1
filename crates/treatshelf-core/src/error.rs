//! Error types for Treatshelf stores

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Coarse classification of a [`StoreError`], for callers that only need to
/// decide how to react (for example which HTTP status to answer with).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Connection,
    Backend,
    Closed,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{op}: invalid argument: {message}")]
    InvalidArgument { op: &'static str, message: String },

    #[error("{op}: treat not found with ID {id:?}")]
    NotFound { op: &'static str, id: String },

    #[error("could not connect to document store: {source}")]
    Connection {
        #[source]
        source: DocumentError,
    },

    #[error("{op}: backend error{}: {source}", fmt_id(.id))]
    Backend {
        op: &'static str,
        id: Option<String>,
        #[source]
        source: DocumentError,
    },

    #[error("{op}: store is closed")]
    Closed { op: &'static str },
}

fn fmt_id(id: &Option<String>) -> String {
    id.as_ref()
        .map(|id| format!(" (ID {:?})", id))
        .unwrap_or_default()
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Connection { .. } => ErrorKind::Connection,
            StoreError::Backend { .. } => ErrorKind::Backend,
            StoreError::Closed { .. } => ErrorKind::Closed,
        }
    }

    pub(crate) fn unassigned_id(op: &'static str) -> Self {
        StoreError::InvalidArgument {
            op,
            message: "treat with unassigned ID".to_string(),
        }
    }

    pub(crate) fn not_found(op: &'static str, id: &str) -> Self {
        StoreError::NotFound {
            op,
            id: id.to_string(),
        }
    }
}

/// Failures talking to the document database.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("document store returned {code} {status}: {message}")]
    Status {
        code: u16,
        status: String,
        message: String,
    },

    #[error("could not decode document: {0}")]
    Decode(String),

    #[error("invalid document store configuration: {0}")]
    Config(String),
}

impl DocumentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocumentError::Status { code: 404, .. })
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(e: serde_json::Error) -> Self {
        DocumentError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_messages() {
        let err = StoreError::not_found("get", "42");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), r#"get: treat not found with ID "42""#);

        let err = StoreError::unassigned_id("delete");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().starts_with("delete: invalid argument"));
    }

    #[test]
    fn test_backend_message_includes_id() {
        let source = DocumentError::Status {
            code: 500,
            status: "INTERNAL".to_string(),
            message: "boom".to_string(),
        };
        let err = StoreError::Backend {
            op: "update",
            id: Some("abc".to_string()),
            source,
        };
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert_eq!(
            err.to_string(),
            r#"update: backend error (ID "abc"): document store returned 500 INTERNAL: boom"#
        );
    }

    #[test]
    fn test_not_found_status() {
        let err = DocumentError::Status {
            code: 404,
            status: "NOT_FOUND".to_string(),
            message: "missing".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!DocumentError::Decode("x".to_string()).is_not_found());
    }
}
