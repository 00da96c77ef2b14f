//! Handler for `/swipes`.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tandem_core::{
  pairing::Match,
  store::MatchStore,
  swipe::{Swipe, SwipeDirection},
};
use tandem_engine::arbiter;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extract::CurrentUser};

#[derive(Debug, Deserialize)]
pub struct SwipeBody {
  pub target_id: Uuid,
  pub direction: SwipeDirection,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
  pub swipe:   Swipe,
  /// The created or pre-existing active match; right-swipes only.
  #[serde(rename = "match")]
  pub matched: Option<Match>,
}

/// `POST /swipes` — body: `{"target_id":"…","direction":"right"}`
///
/// Repeat swipes on the same target return the original row with the same
/// status code; nothing is written twice.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<SwipeBody>,
) -> Result<(StatusCode, Json<SwipeResponse>), ApiError>
where
  S: MatchStore + Clone,
{
  let outcome =
    arbiter::record_swipe(&state.store, user.0, body.target_id, body.direction)
      .await?;
  Ok((
    StatusCode::CREATED,
    Json(SwipeResponse { swipe: outcome.swipe, matched: outcome.matched }),
  ))
}
