//! Request handlers for `/classify`, `/chat`, and `/quote`, plus the shared error type.

pub mod chat;
pub mod classify;
pub mod quote;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

/// Client-visible failure. Chat turns degrade inside the core; only the quote proxy
/// reports an upstream failure.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                tracing::debug!(target: "haven::gateway", error = %msg, "rejected request");
                (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": msg }))).into_response()
            }
            ApiError::Upstream(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": msg })),
            )
                .into_response(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Body shared by `/classify` and `/chat`. Both fields are required and non-empty.
#[derive(Debug, Default, Deserialize)]
pub struct TurnRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl TurnRequest {
    /// `(text, session_id)`, or 400 when either is missing or blank.
    pub fn into_parts(self) -> Result<(String, String), ApiError> {
        let text = self.text.filter(|s| !s.trim().is_empty());
        let session_id = self.session_id.filter(|s| !s.trim().is_empty());
        match (text, session_id) {
            (Some(text), Some(session_id)) => Ok((text, session_id)),
            _ => Err(ApiError::BadRequest(
                "Both 'text' and 'session_id' are required".to_string(),
            )),
        }
    }
}

/// Unwraps the JSON extractor result, mapping any rejection to 400.
pub fn parse_turn(
    payload: Result<Json<TurnRequest>, JsonRejection>,
) -> Result<(String, String), ApiError> {
    let Json(body) = payload?;
    body.into_parts()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_rejected() {
        let cases = [
            TurnRequest::default(),
            TurnRequest { text: Some("hi".into()), session_id: None },
            TurnRequest { text: None, session_id: Some("s1".into()) },
            TurnRequest { text: Some("   ".into()), session_id: Some("s1".into()) },
            TurnRequest { text: Some("hi".into()), session_id: Some(String::new()) },
        ];
        for req in cases {
            assert!(req.into_parts().is_err());
        }
    }

    #[test]
    fn complete_request_passes_through_untrimmed() {
        let req = TurnRequest {
            text: Some(" hello ".into()),
            session_id: Some("s1".into()),
        };
        assert_eq!(req.into_parts().unwrap(), (" hello ".to_string(), "s1".to_string()));
    }
}
