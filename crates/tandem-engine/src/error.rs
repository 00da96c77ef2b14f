//! Error taxonomy for engine operations.
//!
//! Nothing here is fatal to the process; every failure is scoped to one
//! user action. The conflict case on match creation never appears — it is
//! reconciled inside the arbiter and callers see the canonical match.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// No current user where one is required.
  #[error("not signed in")]
  Unauthenticated,

  /// The current user is not a participant of the requested match. Worded
  /// like NotFound so match existence is not leaked to outsiders.
  #[error("match not available")]
  Unauthorized,

  #[error("match not found: {0}")]
  MatchNotFound(Uuid),

  #[error("profile not found: {0}")]
  ProfileNotFound(Uuid),

  /// The id failed shape validation; no store round-trip was made.
  #[error("malformed match id: {0:?}")]
  InvalidMatchId(String),

  #[error(transparent)]
  Validation(#[from] tandem_core::Error),

  /// Transient backend failure; the user may retry the whole action.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
