//! Handlers for `/matches` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/matches` | Active matches for the current user, newest first |
//! | `GET`  | `/matches/:id/messages` | Full history; participants only |
//! | `POST` | `/matches/:id/messages` | Body: `{"content":"…"}` |
//!
//! A foreign match id and an unknown one produce the same 404, so these
//! routes never confirm a match's existence to a non-participant.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tandem_core::{
  message::Message, pairing::Match, profile::Profile, store::MatchStore,
};
use tandem_engine::{chat::ChatSession, roster};

use crate::{AppState, error::ApiError, extract::CurrentUser};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MatchSummaryBody {
  #[serde(rename = "match")]
  pub record: Match,
  pub with:   Profile,
}

/// `GET /matches`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
) -> Result<Json<Vec<MatchSummaryBody>>, ApiError>
where
  S: MatchStore + Clone,
{
  let summaries = roster::list_matches(&state.store, user.0).await?;
  Ok(Json(
    summaries
      .into_iter()
      .map(|s| MatchSummaryBody { record: s.record, with: s.with })
      .collect(),
  ))
}

// ─── Messages ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ChatEntryBody {
  pub message: Message,
  pub sender:  Profile,
}

impl From<tandem_engine::chat::ChatEntry> for ChatEntryBody {
  fn from(entry: tandem_engine::chat::ChatEntry) -> Self {
    Self { message: entry.message, sender: entry.sender }
  }
}

/// `GET /matches/:id/messages`
pub async fn messages<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<String>,
) -> Result<Json<Vec<ChatEntryBody>>, ApiError>
where
  S: MatchStore + Clone + 'static,
{
  let session = ChatSession::open(state.store.clone(), user.0, &id).await?;
  Ok(Json(
    session.messages().iter().cloned().map(Into::into).collect(),
  ))
}

#[derive(Debug, Deserialize)]
pub struct SendBody {
  pub content: String,
}

/// `POST /matches/:id/messages` — body: `{"content":"…"}`
pub async fn send<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<String>,
  Json(body): Json<SendBody>,
) -> Result<(StatusCode, Json<Message>), ApiError>
where
  S: MatchStore + Clone + 'static,
{
  let session = ChatSession::open(state.store.clone(), user.0, &id).await?;
  let message = session.send(&body.content).await?;
  Ok((StatusCode::CREATED, Json(message)))
}
