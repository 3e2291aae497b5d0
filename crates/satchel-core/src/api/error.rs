use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// 401 - the backend rejected the token or the credentials.
    #[error("{message}")]
    Unauthorized { message: String },

    /// 409 - e.g. registering an email that already exists, or favouriting
    /// an image twice.
    #[error("{message}")]
    Conflict { message: String },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("server error: {0}")]
    ServerError(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for raw response bodies carried in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error payload shapes used by the backends: the account backend sends
/// `{"error": ...}`, the contacts service `{"message": ...}`.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid dragging huge payloads into logs
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    /// Pull the human-readable message out of an error body, falling back
    /// to the (truncated) raw body.
    fn extract_message(body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.error.or(parsed.message))
            .unwrap_or_else(|| Self::truncate_body(body))
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::extract_message(body);
        match status.as_u16() {
            400 => ApiError::BadRequest { message },
            401 => ApiError::Unauthorized { message },
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict { message },
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("status {}: {}", status, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_account_backend_error_field() {
        let err = ApiError::from_status(
            reqwest::StatusCode::UNAUTHORIZED,
            r#"{"error": "Invalid credentials"}"#,
        );
        match err {
            ApiError::Unauthorized { message } => assert_eq!(message, "Invalid credentials"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn extracts_contacts_service_message_field() {
        let err = ApiError::from_status(
            reqwest::StatusCode::NOT_FOUND,
            r#"{"message": "Contact not found"}"#,
        );
        match err {
            ApiError::NotFound(message) => assert_eq!(message, "Contact not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn falls_back_to_raw_body() {
        let err = ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "oops");
        match err {
            ApiError::ServerError(message) => assert_eq!(message, "oops"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn truncates_oversized_bodies() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(reqwest::StatusCode::BAD_GATEWAY, &body);
        let text = err.to_string();
        assert!(text.contains("truncated"));
        assert!(text.len() < body.len());
    }
}
