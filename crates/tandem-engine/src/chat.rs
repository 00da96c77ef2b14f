//! Chat sessions — an ordered, live-updating view of one match's messages.

use std::collections::HashSet;

use tandem_core::{
  feed::MessageFeed,
  message::{Message, NewMessage},
  pairing::Match,
  profile::Profile,
  store::MatchStore,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;
use uuid::Uuid;

use crate::{Error, Result};

/// A message joined with its sender's display profile.
#[derive(Debug, Clone)]
pub struct ChatEntry {
  pub message: Message,
  pub sender:  Profile,
}

/// One participant's view of one match's chat.
///
/// Entries are kept in `(created_at, message_id)` order and appended only;
/// earlier entries are never reordered or dropped. Submissions are not
/// echoed locally — the entry arrives through the change feed like anyone
/// else's, so the displayed order always matches the durable order.
#[derive(Debug)]
pub struct ChatSession<S> {
  store:   S,
  user_id: Uuid,
  record:  Match,
  other:   Profile,
  entries: Vec<ChatEntry>,
  seen:    HashSet<Uuid>,
  feed:    MessageFeed,
}

impl<S: MatchStore> ChatSession<S> {
  /// Open the chat for `match_id` on behalf of `user_id`.
  ///
  /// The id shape is validated before any store round-trip, and the user
  /// must be one of the match's two participants. The feed subscription is
  /// taken out before the history load, so an insert racing the load is
  /// delivered through the feed and deduped instead of lost.
  pub async fn open(store: S, user_id: Uuid, match_id: &str) -> Result<Self> {
    let match_id: Uuid = match_id
      .parse()
      .map_err(|_| Error::InvalidMatchId(match_id.to_owned()))?;

    let record = store
      .get_match(match_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::MatchNotFound(match_id))?;

    let other_id =
      record.other_participant(user_id).ok_or(Error::Unauthorized)?;
    let other = store
      .get_profile(other_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ProfileNotFound(other_id))?;

    let feed = store.message_feed();

    let mut session = Self {
      store,
      user_id,
      record,
      other,
      entries: Vec::new(),
      seen: HashSet::new(),
      feed,
    };
    session.load_history().await?;
    Ok(session)
  }

  /// The match under view.
  pub fn record(&self) -> &Match { &self.record }

  /// The counterpart shown in the chat header.
  pub fn other_participant(&self) -> &Profile { &self.other }

  /// All entries loaded so far, in total order.
  pub fn messages(&self) -> &[ChatEntry] { &self.entries }

  async fn load_history(&mut self) -> Result<()> {
    let history = self
      .store
      .messages_for_match(self.record.match_id)
      .await
      .map_err(Error::store)?;
    for message in history {
      self.append(message).await?;
    }
    Ok(())
  }

  /// Append `message` unless its id is already present.
  async fn append(&mut self, message: Message) -> Result<()> {
    if !self.seen.insert(message.message_id) {
      return Ok(());
    }
    let sender = self
      .store
      .get_profile(message.sender_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ProfileNotFound(message.sender_id))?;
    self.entries.push(ChatEntry { message, sender });
    Ok(())
  }

  /// Wait for the next message in this match, append it, and return it.
  /// Returns `None` once the feed closes. After feed lag the durable
  /// history is re-read and missing entries appended with id dedup, so
  /// nothing already shown is replayed.
  pub async fn next_message(&mut self) -> Result<Option<ChatEntry>> {
    loop {
      match self.feed.recv().await {
        Ok(event) => {
          if event.match_id != self.record.match_id {
            continue;
          }
          if self.seen.contains(&event.message_id) {
            continue;
          }
          let Some(message) = self
            .store
            .get_message(event.message_id)
            .await
            .map_err(Error::store)?
          else {
            // The row is durable before its event is published; a miss
            // here is a feed anomaly, not a session failure.
            continue;
          };
          self.append(message).await?;
          return Ok(self.entries.last().cloned());
        }
        Err(RecvError::Closed) => return Ok(None),
        Err(RecvError::Lagged(missed)) => {
          warn!(
            missed,
            match_id = %self.record.match_id,
            "message feed lagged; resyncing from store"
          );
          let before = self.entries.len();
          self.load_history().await?;
          if self.entries.len() > before {
            return Ok(self.entries.last().cloned());
          }
        }
      }
    }
  }

  /// Submit a message as the session user. Content is trimmed and must be
  /// non-empty; the local view is not touched (see the type docs).
  pub async fn send(&self, content: &str) -> Result<Message> {
    let input = NewMessage::new(self.record.match_id, self.user_id, content)?;
    self.store.append_message(input).await.map_err(Error::store)
  }
}
