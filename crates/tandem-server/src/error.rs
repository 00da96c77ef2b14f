//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Error bodies are `{"error": <message>}` plus, where a client-side
//! redirect is warranted, a `"navigate"` field carrying the
//! [`NavigationIntent`].

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use tandem_engine::{Error as EngineError, NavigationIntent};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error(transparent)]
  Engine(#[from] EngineError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message, navigate) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone(), None),
      ApiError::Engine(e) => {
        let status = match e {
          EngineError::Unauthenticated => StatusCode::UNAUTHORIZED,
          EngineError::Unauthorized | EngineError::MatchNotFound(_) => {
            StatusCode::NOT_FOUND
          }
          EngineError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
          EngineError::InvalidMatchId(_) | EngineError::Validation(_) => {
            StatusCode::BAD_REQUEST
          }
          EngineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // One message for both the foreign and the missing match, so a
        // response never reveals whether a match id exists.
        let message = match e {
          EngineError::Unauthorized | EngineError::MatchNotFound(_) => {
            "match not available".to_string()
          }
          other => other.to_string(),
        };
        (status, message, NavigationIntent::for_error(e))
      }
      ApiError::Store(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), None)
      }
    };

    let mut body = json!({ "error": message });
    if let Some(intent) = navigate {
      body["navigate"] =
        serde_json::to_value(intent).unwrap_or(serde_json::Value::Null);
    }
    (status, Json(body)).into_response()
  }
}
