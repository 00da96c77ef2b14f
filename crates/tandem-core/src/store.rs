//! The `MatchStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `tandem-store-sqlite`). The engine and server depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  feed::{MatchFeed, MessageFeed},
  message::{Message, NewMessage},
  pairing::{Match, MatchCreation, NewMatch},
  profile::{NewProfile, Profile},
  swipe::{NewSwipe, SwipeRecord},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`MatchStore::list_candidates`].
#[derive(Debug, Clone, Default)]
pub struct CandidateQuery {
  /// Profile ids that must never be returned (self, swiped targets, matched
  /// counterparts).
  pub exclude:         Vec<Uuid>,
  /// Candidates must carry every one of these skills (exact containment).
  pub required_skills: Vec<String>,
  pub limit:           Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the shared remote store backing the match engine.
///
/// Writes to swipes, matches, and messages are append-only; a match expires
/// by timestamp rather than being mutated. The single transactional
/// guarantee a backend must provide is the conditional match insert: for any
/// unordered user pair at most one active match may exist, enforced at the
/// store so two racing right-swipes resolve to one surviving row.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait MatchStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Persist a profile supplied by the upstream profile editor.
  /// `profile_id` and `created_at` are set by the store.
  fn add_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Retrieve a profile by id. Returns `None` if not found.
  fn get_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// List candidate profiles: not excluded, carrying every required skill,
  /// ordered by `created_at` descending with `profile_id` descending as the
  /// tie-break so repeated calls under no state change return the same rows.
  fn list_candidates<'a>(
    &'a self,
    query: &'a CandidateQuery,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + 'a;

  // ── Swipes — append-only writes ───────────────────────────────────────

  /// Record a swipe. A repeat swipe on the same target returns
  /// [`SwipeRecord::Duplicate`] with the original row; nothing is written.
  fn record_swipe(
    &self,
    input: NewSwipe,
  ) -> impl Future<Output = Result<SwipeRecord, Self::Error>> + Send + '_;

  /// All target ids the given user has ever swiped on, either direction.
  fn swiped_targets(
    &self,
    swiper_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  // ── Matches ───────────────────────────────────────────────────────────

  /// Atomically create a match unless an active one already exists for the
  /// unordered pair, in which case the existing row is returned as
  /// [`MatchCreation::AlreadyActive`]. This conditional insert is the
  /// boundary contract that closes the double-insert race; callers never
  /// check-then-insert.
  fn create_match(
    &self,
    input: NewMatch,
  ) -> impl Future<Output = Result<MatchCreation, Self::Error>> + Send + '_;

  /// Retrieve a match by id. Returns `None` if not found.
  fn get_match(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Match>, Self::Error>> + Send + '_;

  /// All matches involving the user, active or expired. Expired matches
  /// still feed the candidate-selector exclusion set.
  fn matches_for_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Match>, Self::Error>> + Send + '_;

  /// The active match for the unordered pair `{a, b}` as of `now`, if one
  /// exists.
  fn active_match_for_pair(
    &self,
    a: Uuid,
    b: Uuid,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<Match>, Self::Error>> + Send + '_;

  // ── Messages — append-only writes ─────────────────────────────────────

  /// Append a message to its match. `message_id` and `created_at` are set
  /// by the store.
  fn append_message(
    &self,
    input: NewMessage,
  ) -> impl Future<Output = Result<Message, Self::Error>> + Send + '_;

  /// Retrieve a single message by id. Returns `None` if not found.
  fn get_message(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Message>, Self::Error>> + Send + '_;

  /// All messages for a match in `(created_at, message_id)` ascending order.
  fn messages_for_match(
    &self,
    match_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Message>, Self::Error>> + Send + '_;

  // ── Change feed ───────────────────────────────────────────────────────

  /// Subscribe to match-insert events. Each call returns an independent
  /// receiver; dropping it ends the subscription.
  fn match_feed(&self) -> MatchFeed;

  /// Subscribe to message-insert events across all matches; consumers
  /// filter by `match_id`.
  fn message_feed(&self) -> MessageFeed;
}
