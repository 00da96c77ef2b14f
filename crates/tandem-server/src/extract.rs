//! Session identity extraction.
//!
//! Authentication itself lives upstream; a fronting identity layer
//! verifies the session and forwards the user id in the `x-user-id`
//! header. This service trusts that header and treats its absence as an
//! unauthenticated request.

use axum::{extract::FromRequestParts, http::request::Parts};
use tandem_engine::Error as EngineError;
use uuid::Uuid;

use crate::error::ApiError;

pub const USER_HEADER: &str = "x-user-id";

/// The authenticated user a request acts as.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Uuid);

impl<St: Send + Sync> FromRequestParts<St> for CurrentUser {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &St,
  ) -> Result<Self, Self::Rejection> {
    let id = parts
      .headers
      .get(USER_HEADER)
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.parse().ok())
      .ok_or(ApiError::Engine(EngineError::Unauthenticated))?;
    Ok(Self(id))
  }
}
