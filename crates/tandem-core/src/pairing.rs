//! Match — the connection record pairing two profiles for chat.
//!
//! Under the immediate-connection policy any right-swipe creates a match.
//! A match row is never updated or deleted: the only stored status is
//! `initiated`, and expiry is derived at read time from `expires_at`.
//! For any unordered user pair at most one active match exists at a time;
//! that invariant is enforced by the store backend, not by callers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// How long a match stays active after creation.
pub const MATCH_TTL_DAYS: i64 = 7;

/// The read-time lifecycle state of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
  /// Created by a right-swipe; the only status ever stored.
  Initiated,
  /// Derived: `now >= expires_at`. Never written to the store.
  Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
  pub match_id:     Uuid,
  /// The initiating participant (`initiator_id == user1_id`).
  pub user1_id:     Uuid,
  pub user2_id:     Uuid,
  pub initiator_id: Uuid,
  pub created_at:   DateTime<Utc>,
  pub expires_at:   DateTime<Utc>,
}

impl Match {
  pub fn status_at(&self, now: DateTime<Utc>) -> MatchStatus {
    if now >= self.expires_at {
      MatchStatus::Expired
    } else {
      MatchStatus::Initiated
    }
  }

  pub fn is_active(&self, now: DateTime<Utc>) -> bool {
    self.status_at(now) == MatchStatus::Initiated
  }

  pub fn involves(&self, user_id: Uuid) -> bool {
    self.user1_id == user_id || self.user2_id == user_id
  }

  /// The participant that is not `user_id`, or `None` if `user_id` is not a
  /// participant at all.
  pub fn other_participant(&self, user_id: Uuid) -> Option<Uuid> {
    if user_id == self.user1_id {
      Some(self.user2_id)
    } else if user_id == self.user2_id {
      Some(self.user1_id)
    } else {
      None
    }
  }
}

/// Order a pair of user ids canonically so {A,B} and {B,A} key identically.
pub fn canonical_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
  if a <= b { (a, b) } else { (b, a) }
}

/// Expiry timestamp for a match created at `created_at`.
pub fn expiry_for(created_at: DateTime<Utc>) -> DateTime<Utc> {
  created_at + Duration::days(MATCH_TTL_DAYS)
}

/// Input to [`crate::store::MatchStore::create_match`].
/// The initiator becomes `user1_id`; id and timestamps are assigned by the
/// store.
#[derive(Debug, Clone)]
pub struct NewMatch {
  pub initiator_id: Uuid,
  pub target_id:    Uuid,
}

impl NewMatch {
  pub fn new(initiator_id: Uuid, target_id: Uuid) -> Result<Self> {
    if initiator_id == target_id {
      return Err(Error::SelfMatch);
    }
    Ok(Self { initiator_id, target_id })
  }
}

/// Outcome of a conditional match insert. Losing the creation race is a
/// normal domain outcome, not an error: the existing active row is canonical
/// and both sides end up referencing the same match id.
#[derive(Debug, Clone)]
pub enum MatchCreation {
  Created(Match),
  AlreadyActive(Match),
}

impl MatchCreation {
  pub fn record(&self) -> &Match {
    match self {
      Self::Created(m) | Self::AlreadyActive(m) => m,
    }
  }

  pub fn into_match(self) -> Match {
    match self {
      Self::Created(m) | Self::AlreadyActive(m) => m,
    }
  }

  pub fn was_created(&self) -> bool { matches!(self, Self::Created(_)) }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample(created_at: DateTime<Utc>) -> Match {
    let user1 = Uuid::new_v4();
    let user2 = Uuid::new_v4();
    Match {
      match_id:     Uuid::new_v4(),
      user1_id:     user1,
      user2_id:     user2,
      initiator_id: user1,
      created_at,
      expires_at:   expiry_for(created_at),
    }
  }

  #[test]
  fn status_is_initiated_until_expiry() {
    let created = Utc::now();
    let m = sample(created);
    assert_eq!(m.status_at(created), MatchStatus::Initiated);
    assert_eq!(
      m.status_at(created + Duration::days(MATCH_TTL_DAYS) - Duration::seconds(1)),
      MatchStatus::Initiated
    );
    assert_eq!(
      m.status_at(created + Duration::days(MATCH_TTL_DAYS)),
      MatchStatus::Expired
    );
  }

  #[test]
  fn other_participant_resolves_both_sides() {
    let m = sample(Utc::now());
    assert_eq!(m.other_participant(m.user1_id), Some(m.user2_id));
    assert_eq!(m.other_participant(m.user2_id), Some(m.user1_id));
    assert_eq!(m.other_participant(Uuid::new_v4()), None);
  }

  #[test]
  fn canonical_pair_ignores_argument_order() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    assert_eq!(canonical_pair(a, b), canonical_pair(b, a));
  }

  #[test]
  fn self_match_is_rejected() {
    let id = Uuid::new_v4();
    assert_eq!(NewMatch::new(id, id).unwrap_err(), Error::SelfMatch);
  }
}
