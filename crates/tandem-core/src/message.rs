//! Message — an immutable chat line belonging to exactly one match.
//!
//! Messages are ordered by `(created_at, message_id)`; the id tie-break
//! keeps the order total and deterministic even with equal timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
  pub message_id: Uuid,
  pub match_id:   Uuid,
  pub sender_id:  Uuid,
  pub content:    String,
  pub created_at: DateTime<Utc>,
}

impl Message {
  /// The total-order sort key within a match.
  pub fn sort_key(&self) -> (DateTime<Utc>, Uuid) {
    (self.created_at, self.message_id)
  }
}

/// Input to [`crate::store::MatchStore::append_message`].
/// Content is trimmed; empty or whitespace-only content is rejected before
/// any store call.
#[derive(Debug, Clone)]
pub struct NewMessage {
  pub match_id:  Uuid,
  pub sender_id: Uuid,
  pub content:   String,
}

impl NewMessage {
  pub fn new(match_id: Uuid, sender_id: Uuid, content: &str) -> Result<Self> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
      return Err(Error::EmptyMessage);
    }
    Ok(Self { match_id, sender_id, content: trimmed.to_owned() })
  }
}
