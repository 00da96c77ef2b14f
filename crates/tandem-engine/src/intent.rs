//! The abstract navigation boundary.
//!
//! The engine never performs view transitions; it emits intents and the
//! hosting shell carries them out.

use serde::Serialize;
use uuid::Uuid;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "to", content = "match_id", rename_all = "snake_case")]
pub enum NavigationIntent {
  Chat(Uuid),
  Matches,
  Login,
}

impl NavigationIntent {
  /// Where the shell should send the user after `err` aborted an action,
  /// if a redirect is warranted at all.
  pub fn for_error(err: &Error) -> Option<Self> {
    match err {
      Error::Unauthenticated => Some(Self::Login),
      Error::Unauthorized
      | Error::MatchNotFound(_)
      | Error::InvalidMatchId(_) => Some(Self::Matches),
      _ => None,
    }
  }
}
