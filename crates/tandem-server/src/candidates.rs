//! Handler for `/candidates/next` — the swipe deck feed.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use tandem_core::{profile::Profile, store::MatchStore};
use tandem_engine::selector;

use crate::{AppState, error::ApiError, extract::CurrentUser};

#[derive(Debug, Deserialize)]
pub struct NextParams {
  /// Comma-separated skill filter; every listed skill must be present.
  pub skills: Option<String>,
}

/// `GET /candidates/next[?skills=rust,sql]`
///
/// The next profile for the current user to decide on, or `null` once the
/// pool is exhausted.
pub async fn next<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Query(params): Query<NextParams>,
) -> Result<Json<Option<Profile>>, ApiError>
where
  S: MatchStore + Clone,
{
  let skills: Vec<String> = params
    .skills
    .as_deref()
    .unwrap_or("")
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
    .collect();

  let candidate = selector::next_candidate(&state.store, user.0, &skills).await?;
  Ok(Json(candidate))
}
