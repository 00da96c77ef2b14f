//! Match-event notification for a user session.

use std::collections::HashSet;

use tandem_core::{feed::MatchFeed, profile::Profile, store::MatchStore};
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;
use uuid::Uuid;

use crate::{Error, NavigationIntent, Result};

/// A one-time "new match" notification for a session, with the counterpart
/// profile for display and the navigation target the shell should offer.
#[derive(Debug, Clone)]
pub struct MatchNotification {
  pub match_id: Uuid,
  /// Always the initiator — only the non-initiating side is notified.
  pub with:     Profile,
  pub navigate: NavigationIntent,
}

/// Watches the match feed on behalf of one user session and yields a
/// notification for every match someone else initiated with them.
///
/// Dedup is keyed by match id, so at-least-once feed delivery fires each
/// notification exactly once. Dropping the notifier tears the subscription
/// down; nothing fires afterwards.
pub struct MatchNotifier<S> {
  store:   S,
  user_id: Uuid,
  feed:    MatchFeed,
  seen:    HashSet<Uuid>,
}

impl<S: MatchStore> MatchNotifier<S> {
  pub fn new(store: S, user_id: Uuid) -> Self {
    let feed = store.match_feed();
    Self { store, user_id, feed, seen: HashSet::new() }
  }

  /// The next notification for this session, or `None` once the feed
  /// closes. Events for other users' matches, self-initiated matches, and
  /// already-seen match ids are skipped without surfacing.
  pub async fn next(&mut self) -> Result<Option<MatchNotification>> {
    loop {
      let event = match self.feed.recv().await {
        Ok(event) => event,
        Err(RecvError::Closed) => return Ok(None),
        Err(RecvError::Lagged(missed)) => {
          // A missed creation event is not re-announced; the match stays
          // reachable through the matches overview.
          warn!(missed, user_id = %self.user_id, "match feed lagged");
          continue;
        }
      };

      if event.initiator_id == self.user_id {
        continue;
      }
      if event.user1_id != self.user_id && event.user2_id != self.user_id {
        continue;
      }
      if !self.seen.insert(event.match_id) {
        continue;
      }

      let with = self
        .store
        .get_profile(event.initiator_id)
        .await
        .map_err(Error::store)?
        .ok_or(Error::ProfileNotFound(event.initiator_id))?;

      return Ok(Some(MatchNotification {
        match_id: event.match_id,
        with,
        navigate: NavigationIntent::Chat(event.match_id),
      }));
    }
  }
}
