//! Swipe recording and match arbitration.
//!
//! Immediate-connection policy: any right-swipe connects the pair at once
//! (no reciprocity check), unless an active match already exists. The
//! uniqueness race between two simultaneous right-swipes is closed by the
//! store's conditional insert, not here.

use chrono::Utc;
use tandem_core::{
  pairing::{Match, NewMatch},
  store::MatchStore,
  swipe::{NewSwipe, Swipe, SwipeDirection},
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{Error, Result};

/// What a swipe produced.
#[derive(Debug, Clone)]
pub struct SwipeOutcome {
  pub swipe:   Swipe,
  /// The created or pre-existing active match; only ever set for
  /// right-swipes.
  pub matched: Option<Match>,
}

/// Record a swipe by `user_id` on `target_id` and, for right-swipes, settle
/// the match question.
///
/// A repeat swipe on the same target is an idempotent no-op: nothing is
/// written and the existing state is returned. If the match insert fails
/// after the swipe row was recorded, the error is surfaced without a retry
/// — the recorded swipe already keeps the target out of future candidate
/// selections, so the user is never shown that profile again.
pub async fn record_swipe<S: MatchStore>(
  store: &S,
  user_id: Uuid,
  target_id: Uuid,
  direction: SwipeDirection,
) -> Result<SwipeOutcome> {
  let input = NewSwipe::new(user_id, target_id, direction)?;
  let record = store.record_swipe(input).await.map_err(Error::store)?;

  if record.is_duplicate() {
    debug!(%user_id, %target_id, "repeat swipe ignored");
    let matched = store
      .active_match_for_pair(user_id, target_id, Utc::now())
      .await
      .map_err(Error::store)?;
    return Ok(SwipeOutcome { swipe: record.into_swipe(), matched });
  }

  let swipe = record.into_swipe();
  if !direction.is_right() {
    return Ok(SwipeOutcome { swipe, matched: None });
  }

  let creation = store
    .create_match(NewMatch::new(user_id, target_id)?)
    .await
    .map_err(Error::store)?;
  if creation.was_created() {
    info!(match_id = %creation.record().match_id, %user_id, %target_id, "match created");
  } else {
    debug!(
      match_id = %creation.record().match_id,
      "active match already exists for pair"
    );
  }

  Ok(SwipeOutcome { swipe, matched: Some(creation.into_match()) })
}
