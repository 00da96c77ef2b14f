//! Swipe — an immutable directional decision by one user about another.
//!
//! Swipes are never mutated or deleted. Both directions are recorded so the
//! candidate selector can exclude everyone the user has already decided on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
  Left,
  Right,
}

impl SwipeDirection {
  pub fn is_right(self) -> bool { matches!(self, Self::Right) }
}

/// An immutable swipe fact: at most one per (swiper, target) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swipe {
  pub swipe_id:   Uuid,
  pub swiper_id:  Uuid,
  pub target_id:  Uuid,
  pub direction:  SwipeDirection,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::MatchStore::record_swipe`].
/// Construction rejects self-swipes before any store call.
#[derive(Debug, Clone)]
pub struct NewSwipe {
  pub swiper_id: Uuid,
  pub target_id: Uuid,
  pub direction: SwipeDirection,
}

impl NewSwipe {
  pub fn new(
    swiper_id: Uuid,
    target_id: Uuid,
    direction: SwipeDirection,
  ) -> Result<Self> {
    if swiper_id == target_id {
      return Err(Error::SelfSwipe);
    }
    Ok(Self { swiper_id, target_id, direction })
  }
}

/// Outcome of recording a swipe. A repeat swipe on the same target is an
/// idempotent no-op, not an error; the original row is returned unchanged.
#[derive(Debug, Clone)]
pub enum SwipeRecord {
  Recorded(Swipe),
  Duplicate(Swipe),
}

impl SwipeRecord {
  pub fn swipe(&self) -> &Swipe {
    match self {
      Self::Recorded(s) | Self::Duplicate(s) => s,
    }
  }

  pub fn into_swipe(self) -> Swipe {
    match self {
      Self::Recorded(s) | Self::Duplicate(s) => s,
    }
  }

  pub fn is_duplicate(&self) -> bool { matches!(self, Self::Duplicate(_)) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn self_swipe_is_rejected_locally() {
    let id = Uuid::new_v4();
    let err = NewSwipe::new(id, id, SwipeDirection::Right).unwrap_err();
    assert_eq!(err, Error::SelfSwipe);
  }

  #[test]
  fn distinct_users_are_accepted() {
    let s =
      NewSwipe::new(Uuid::new_v4(), Uuid::new_v4(), SwipeDirection::Left);
    assert!(s.is_ok());
  }
}
