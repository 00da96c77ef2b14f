//! Candidate selection — the next profile to show a user.

use std::collections::HashSet;

use tandem_core::{
  profile::Profile,
  store::{CandidateQuery, MatchStore},
};
use uuid::Uuid;

use crate::{Error, Result};

/// Pick the next profile for `user_id` to decide on, or `None` when the
/// pool is exhausted.
///
/// Excluded: the user themself, every target they already swiped on (either
/// direction), and the counterpart of every match they appear in, expired
/// ones included. Ordering is newest-profile-first with an id tie-break, so
/// repeated calls with no intervening writes return the same profile.
///
/// Read-only; a store failure propagates as transient and the caller may
/// simply retry.
pub async fn next_candidate<S: MatchStore>(
  store: &S,
  user_id: Uuid,
  required_skills: &[String],
) -> Result<Option<Profile>> {
  let swiped = store.swiped_targets(user_id).await.map_err(Error::store)?;
  let matches = store.matches_for_user(user_id).await.map_err(Error::store)?;

  let mut exclude: HashSet<Uuid> = HashSet::new();
  exclude.insert(user_id);
  exclude.extend(swiped);
  exclude.extend(matches.iter().filter_map(|m| m.other_participant(user_id)));

  let query = CandidateQuery {
    exclude:         exclude.into_iter().collect(),
    required_skills: required_skills.to_vec(),
    limit:           Some(1),
  };

  let candidates =
    store.list_candidates(&query).await.map_err(Error::store)?;
  Ok(candidates.into_iter().next())
}
