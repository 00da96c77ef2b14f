//! HTTP layer for Tandem.
//!
//! Exposes an axum [`Router`] backed by any
//! [`tandem_core::store::MatchStore`]. Authentication lives upstream; each
//! request carries its session identity in the `x-user-id` header (see
//! [`extract`]). Realtime delivery uses server-sent events (see [`events`]).

pub mod candidates;
pub mod error;
pub mod events;
pub mod extract;
pub mod matches;
pub mod profiles;
pub mod swipes;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tandem_core::store::MatchStore;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: Clone> {
  pub store:  S,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the match and messaging API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: MatchStore + Clone + 'static,
{
  Router::new()
    // Profiles
    .route("/profiles", post(profiles::create::<S>))
    .route("/profiles/{id}", get(profiles::get_one::<S>))
    // Swipe deck
    .route("/candidates/next", get(candidates::next::<S>))
    .route("/swipes", post(swipes::create::<S>))
    // Matches and chat
    .route("/matches", get(matches::list::<S>))
    .route(
      "/matches/{id}/messages",
      get(matches::messages::<S>).post(matches::send::<S>),
    )
    .route("/matches/{id}/events", get(events::message_stream::<S>))
    // Match notifications
    .route("/events/matches", get(events::match_stream::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
