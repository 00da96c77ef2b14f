//! Handlers for `/profiles` endpoints — the boundary where the upstream
//! profile editor's records enter the engine.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/profiles` | Body: a profile record; id and timestamp assigned here |
//! | `GET`  | `/profiles/:id` | 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use tandem_core::{
  profile::{NewProfile, Profile},
  store::MatchStore,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// `POST /profiles`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewProfile>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MatchStore + Clone,
{
  let profile = state
    .store
    .add_profile(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(profile)))
}

/// `GET /profiles/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError>
where
  S: MatchStore + Clone,
{
  let profile = state
    .store
    .get_profile(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("profile {id} not found")))?;
  Ok(Json(profile))
}
