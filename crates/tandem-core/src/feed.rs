//! Change-feed event types.
//!
//! The store publishes an event after each durable insert on the `matches`
//! and `messages` tables. Delivery is at-least-once: consumers fetch the row
//! by id and dedup on it, so a re-delivered event is harmless. Events carry
//! ids and routing fields only, never full row payloads.
//!
//! Dropping a receiver is the teardown; no buffered events fire after it.

use tokio::sync::broadcast;
use uuid::Uuid;

/// Buffer size for feed channels. A consumer that falls further behind than
/// this sees a lag error and recovers by re-reading and deduping.
pub const FEED_CAPACITY: usize = 256;

/// A row was inserted into the `matches` table.
#[derive(Debug, Clone, Copy)]
pub struct MatchEvent {
  pub match_id:     Uuid,
  pub user1_id:     Uuid,
  pub user2_id:     Uuid,
  pub initiator_id: Uuid,
}

/// A row was inserted into the `messages` table.
#[derive(Debug, Clone, Copy)]
pub struct MessageEvent {
  pub message_id: Uuid,
  pub match_id:   Uuid,
  pub sender_id:  Uuid,
}

pub type MatchFeed = broadcast::Receiver<MatchEvent>;
pub type MessageFeed = broadcast::Receiver<MessageEvent>;
