//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings (which sort
//! chronologically). Skill tags are stored as compact JSON arrays. UUIDs
//! are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use tandem_core::{
  message::Message,
  pairing::Match,
  profile::{ExperienceTier, Profile},
  swipe::{Swipe, SwipeDirection},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── SwipeDirection ──────────────────────────────────────────────────────────

pub fn encode_direction(d: SwipeDirection) -> &'static str {
  match d {
    SwipeDirection::Left => "left",
    SwipeDirection::Right => "right",
  }
}

pub fn decode_direction(s: &str) -> Result<SwipeDirection> {
  match s {
    "left" => Ok(SwipeDirection::Left),
    "right" => Ok(SwipeDirection::Right),
    other => Err(Error::Decode(format!("unknown swipe direction: {other:?}"))),
  }
}

// ─── ExperienceTier ──────────────────────────────────────────────────────────

pub fn encode_experience(e: ExperienceTier) -> &'static str {
  match e {
    ExperienceTier::Beginner => "beginner",
    ExperienceTier::Intermediate => "intermediate",
    ExperienceTier::Advanced => "advanced",
  }
}

pub fn decode_experience(s: &str) -> Result<ExperienceTier> {
  match s {
    "beginner" => Ok(ExperienceTier::Beginner),
    "intermediate" => Ok(ExperienceTier::Intermediate),
    "advanced" => Ok(ExperienceTier::Advanced),
    other => Err(Error::Decode(format!("unknown experience tier: {other:?}"))),
  }
}

// ─── Skills ──────────────────────────────────────────────────────────────────

pub fn encode_skills(skills: &[String]) -> Result<String> {
  Ok(serde_json::to_string(skills)?)
}

/// Lenient by design: rows written by earlier revisions may carry a missing
/// or malformed skills array, which decodes to the empty set.
pub fn decode_skills(s: &str) -> Vec<String> {
  serde_json::from_str(s).unwrap_or_default()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `profiles` row.
pub struct RawProfile {
  pub profile_id:    String,
  pub display_name:  String,
  pub bio:           String,
  pub skills:        String,
  pub experience:    String,
  pub github_url:    Option<String>,
  pub portfolio_url: Option<String>,
  pub avatar_url:    Option<String>,
  pub created_at:    String,
}

impl RawProfile {
  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      profile_id:    decode_uuid(&self.profile_id)?,
      display_name:  self.display_name,
      bio:           self.bio,
      skills:        decode_skills(&self.skills),
      experience:    decode_experience(&self.experience)?,
      github_url:    self.github_url,
      portfolio_url: self.portfolio_url,
      avatar_url:    self.avatar_url,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `swipes` row.
pub struct RawSwipe {
  pub swipe_id:   String,
  pub swiper_id:  String,
  pub target_id:  String,
  pub direction:  String,
  pub created_at: String,
}

impl RawSwipe {
  pub fn into_swipe(self) -> Result<Swipe> {
    Ok(Swipe {
      swipe_id:   decode_uuid(&self.swipe_id)?,
      swiper_id:  decode_uuid(&self.swiper_id)?,
      target_id:  decode_uuid(&self.target_id)?,
      direction:  decode_direction(&self.direction)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `matches` row.
pub struct RawMatch {
  pub match_id:     String,
  pub user1_id:     String,
  pub user2_id:     String,
  pub initiator_id: String,
  pub created_at:   String,
  pub expires_at:   String,
}

impl RawMatch {
  pub fn into_match(self) -> Result<Match> {
    Ok(Match {
      match_id:     decode_uuid(&self.match_id)?,
      user1_id:     decode_uuid(&self.user1_id)?,
      user2_id:     decode_uuid(&self.user2_id)?,
      initiator_id: decode_uuid(&self.initiator_id)?,
      created_at:   decode_dt(&self.created_at)?,
      expires_at:   decode_dt(&self.expires_at)?,
    })
  }
}

/// Raw strings read directly from a `messages` row.
pub struct RawMessage {
  pub message_id: String,
  pub match_id:   String,
  pub sender_id:  String,
  pub content:    String,
  pub created_at: String,
}

impl RawMessage {
  pub fn into_message(self) -> Result<Message> {
    Ok(Message {
      message_id: decode_uuid(&self.message_id)?,
      match_id:   decode_uuid(&self.match_id)?,
      sender_id:  decode_uuid(&self.sender_id)?,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
