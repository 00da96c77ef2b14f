//! The matches overview — a user's active connections.

use chrono::Utc;
use tandem_core::{pairing::Match, profile::Profile, store::MatchStore};
use uuid::Uuid;

use crate::{Error, Result};

/// One active match joined with the counterpart's profile.
#[derive(Debug, Clone)]
pub struct MatchSummary {
  pub record: Match,
  pub with:   Profile,
}

/// All currently active matches for `user_id`, newest first. Expired
/// matches are filtered at read time; their rows remain in the store.
pub async fn list_matches<S: MatchStore>(
  store: &S,
  user_id: Uuid,
) -> Result<Vec<MatchSummary>> {
  let now = Utc::now();
  let all = store.matches_for_user(user_id).await.map_err(Error::store)?;

  let mut summaries = Vec::new();
  for record in all {
    if !record.is_active(now) {
      continue;
    }
    let Some(other_id) = record.other_participant(user_id) else {
      continue;
    };
    // A counterpart whose profile row has gone missing upstream is skipped
    // rather than failing the whole overview.
    let Some(with) =
      store.get_profile(other_id).await.map_err(Error::store)?
    else {
      continue;
    };
    summaries.push(MatchSummary { record, with });
  }

  Ok(summaries)
}
