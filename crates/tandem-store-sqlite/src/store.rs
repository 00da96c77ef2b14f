//! [`SqliteStore`] — the SQLite implementation of [`MatchStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tokio::sync::broadcast;
use uuid::Uuid;

use tandem_core::{
  feed::{FEED_CAPACITY, MatchEvent, MatchFeed, MessageEvent, MessageFeed},
  message::{Message, NewMessage},
  pairing::{Match, MatchCreation, NewMatch, canonical_pair, expiry_for},
  profile::{NewProfile, Profile},
  store::{CandidateQuery, MatchStore},
  swipe::{NewSwipe, Swipe, SwipeRecord},
};

use crate::{
  Error, Result,
  encode::{
    RawMatch, RawMessage, RawProfile, RawSwipe, encode_direction, encode_dt,
    encode_experience, encode_skills, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row mappers ─────────────────────────────────────────────────────────────

fn profile_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProfile> {
  Ok(RawProfile {
    profile_id:    row.get(0)?,
    display_name:  row.get(1)?,
    bio:           row.get(2)?,
    skills:        row.get(3)?,
    experience:    row.get(4)?,
    github_url:    row.get(5)?,
    portfolio_url: row.get(6)?,
    avatar_url:    row.get(7)?,
    created_at:    row.get(8)?,
  })
}

fn swipe_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSwipe> {
  Ok(RawSwipe {
    swipe_id:   row.get(0)?,
    swiper_id:  row.get(1)?,
    target_id:  row.get(2)?,
    direction:  row.get(3)?,
    created_at: row.get(4)?,
  })
}

fn match_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawMatch> {
  Ok(RawMatch {
    match_id:     row.get(0)?,
    user1_id:     row.get(1)?,
    user2_id:     row.get(2)?,
    initiator_id: row.get(3)?,
    created_at:   row.get(4)?,
    expires_at:   row.get(5)?,
  })
}

fn message_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawMessage> {
  Ok(RawMessage {
    message_id: row.get(0)?,
    match_id:   row.get(1)?,
    sender_id:  row.get(2)?,
    content:    row.get(3)?,
    created_at: row.get(4)?,
  })
}

const PROFILE_COLS: &str = "profile_id, display_name, bio, skills, \
                            experience, github_url, portfolio_url, \
                            avatar_url, created_at";
const MATCH_COLS: &str =
  "match_id, user1_id, user2_id, initiator_id, created_at, expires_at";

/// The canonical `{min}:{max}` key for an unordered user pair.
fn pair_key(a: Uuid, b: Uuid) -> String {
  let (lo, hi) = canonical_pair(a, b);
  format!("{lo}:{hi}")
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tandem match store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted and all
/// clones publish into the same change-feed channels.
#[derive(Clone, Debug)]
pub struct SqliteStore {
  conn:       tokio_rusqlite::Connection,
  match_tx:   broadcast::Sender<MatchEvent>,
  message_tx: broadcast::Sender<MessageEvent>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self::with_conn(conn);
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self::with_conn(conn);
    store.init_schema().await?;
    Ok(store)
  }

  fn with_conn(conn: tokio_rusqlite::Connection) -> Self {
    let (match_tx, _) = broadcast::channel(FEED_CAPACITY);
    let (message_tx, _) = broadcast::channel(FEED_CAPACITY);
    Self { conn, match_tx, message_tx }
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── MatchStore impl ─────────────────────────────────────────────────────────

impl MatchStore for SqliteStore {
  type Error = Error;

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn add_profile(&self, input: NewProfile) -> Result<Profile> {
    let profile = Profile {
      profile_id:    Uuid::new_v4(),
      display_name:  input.display_name,
      bio:           input.bio,
      skills:        input.skills,
      experience:    input.experience,
      github_url:    input.github_url,
      portfolio_url: input.portfolio_url,
      avatar_url:    input.avatar_url,
      created_at:    Utc::now(),
    };

    let id_str         = encode_uuid(profile.profile_id);
    let display_name   = profile.display_name.clone();
    let bio            = profile.bio.clone();
    let skills_str     = encode_skills(&profile.skills)?;
    let experience_str = encode_experience(profile.experience).to_owned();
    let github_url     = profile.github_url.clone();
    let portfolio_url  = profile.portfolio_url.clone();
    let avatar_url     = profile.avatar_url.clone();
    let at_str         = encode_dt(profile.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (
             profile_id, display_name, bio, skills, experience,
             github_url, portfolio_url, avatar_url, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            display_name,
            bio,
            skills_str,
            experience_str,
            github_url,
            portfolio_url,
            avatar_url,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(profile)
  }

  async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROFILE_COLS} FROM profiles WHERE profile_id = ?1"),
              rusqlite::params![id_str],
              profile_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn list_candidates(&self, query: &CandidateQuery) -> Result<Vec<Profile>> {
    let exclude: Vec<String> =
      query.exclude.iter().copied().map(encode_uuid).collect();

    let raws: Vec<RawProfile> = self
      .conn
      .call(move |conn| {
        let sql = if exclude.is_empty() {
          format!(
            "SELECT {PROFILE_COLS} FROM profiles
             ORDER BY created_at DESC, profile_id DESC"
          )
        } else {
          let placeholders = vec!["?"; exclude.len()].join(", ");
          format!(
            "SELECT {PROFILE_COLS} FROM profiles
             WHERE profile_id NOT IN ({placeholders})
             ORDER BY created_at DESC, profile_id DESC"
          )
        };

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(exclude.iter()), profile_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut profiles: Vec<Profile> = raws
      .into_iter()
      .map(RawProfile::into_profile)
      .collect::<Result<_>>()?;

    // Skill containment is exact set membership; a JSON substring trick in
    // SQL cannot express it, so the filter runs on decoded rows before the
    // limit is applied.
    if !query.required_skills.is_empty() {
      profiles.retain(|p| p.has_all_skills(&query.required_skills));
    }
    if let Some(limit) = query.limit {
      profiles.truncate(limit);
    }

    Ok(profiles)
  }

  // ── Swipes — append-only writes ───────────────────────────────────────────

  async fn record_swipe(&self, input: NewSwipe) -> Result<SwipeRecord> {
    let swipe = Swipe {
      swipe_id:   Uuid::new_v4(),
      swiper_id:  input.swiper_id,
      target_id:  input.target_id,
      direction:  input.direction,
      created_at: Utc::now(),
    };

    let id_str        = encode_uuid(swipe.swipe_id);
    let swiper_str    = encode_uuid(swipe.swiper_id);
    let target_str    = encode_uuid(swipe.target_id);
    let direction_str = encode_direction(swipe.direction).to_owned();
    let at_str        = encode_dt(swipe.created_at);

    let existing: Option<RawSwipe> = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT OR IGNORE INTO swipes
             (swipe_id, swiper_id, target_id, direction, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, swiper_str, target_str, direction_str, at_str],
        )?;
        if inserted == 1 {
          return Ok(None);
        }
        // The (swiper, target) pair already has its immutable row;
        // return it unchanged.
        let raw = conn.query_row(
          "SELECT swipe_id, swiper_id, target_id, direction, created_at
           FROM swipes WHERE swiper_id = ?1 AND target_id = ?2",
          rusqlite::params![swiper_str, target_str],
          swipe_row,
        )?;
        Ok(Some(raw))
      })
      .await?;

    match existing {
      None => Ok(SwipeRecord::Recorded(swipe)),
      Some(raw) => Ok(SwipeRecord::Duplicate(raw.into_swipe()?)),
    }
  }

  async fn swiped_targets(&self, swiper_id: Uuid) -> Result<Vec<Uuid>> {
    let swiper_str = encode_uuid(swiper_id);

    let ids: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare("SELECT target_id FROM swipes WHERE swiper_id = ?1")?;
        let rows = stmt
          .query_map(rusqlite::params![swiper_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    ids
      .iter()
      .map(|s| Uuid::parse_str(s).map_err(Error::Uuid))
      .collect()
  }

  // ── Matches ───────────────────────────────────────────────────────────────

  async fn create_match(&self, input: NewMatch) -> Result<MatchCreation> {
    let now = Utc::now();
    let record = Match {
      match_id:     Uuid::new_v4(),
      user1_id:     input.initiator_id,
      user2_id:     input.target_id,
      initiator_id: input.initiator_id,
      created_at:   now,
      expires_at:   expiry_for(now),
    };

    let id_str        = encode_uuid(record.match_id);
    let user1_str     = encode_uuid(record.user1_id);
    let user2_str     = encode_uuid(record.user2_id);
    let initiator_str = encode_uuid(record.initiator_id);
    let key           = pair_key(record.user1_id, record.user2_id);
    let created_str   = encode_dt(record.created_at);
    let expires_str   = encode_dt(record.expires_at);

    // Existence check and insert execute as one SQL statement, so two
    // racing right-swipes cannot both pass the check. The loser reads the
    // surviving row in the same serialized call.
    let existing: Option<RawMatch> = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO matches
             (match_id, user1_id, user2_id, initiator_id, pair_key,
              status, created_at, expires_at)
           SELECT ?1, ?2, ?3, ?4, ?5, 'initiated', ?6, ?7
           WHERE NOT EXISTS (
             SELECT 1 FROM matches WHERE pair_key = ?5 AND expires_at > ?6
           )",
          rusqlite::params![
            id_str,
            user1_str,
            user2_str,
            initiator_str,
            key,
            created_str,
            expires_str,
          ],
        )?;
        if inserted == 1 {
          return Ok(None);
        }
        let raw = conn.query_row(
          &format!(
            "SELECT {MATCH_COLS} FROM matches
             WHERE pair_key = ?1 AND expires_at > ?2
             ORDER BY created_at DESC
             LIMIT 1"
          ),
          rusqlite::params![key, created_str],
          match_row,
        )?;
        Ok(Some(raw))
      })
      .await?;

    match existing {
      None => {
        // Publish only after the row is durable; a send with no
        // subscribers is fine.
        let _ = self.match_tx.send(MatchEvent {
          match_id:     record.match_id,
          user1_id:     record.user1_id,
          user2_id:     record.user2_id,
          initiator_id: record.initiator_id,
        });
        Ok(MatchCreation::Created(record))
      }
      Some(raw) => Ok(MatchCreation::AlreadyActive(raw.into_match()?)),
    }
  }

  async fn get_match(&self, id: Uuid) -> Result<Option<Match>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMatch> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {MATCH_COLS} FROM matches WHERE match_id = ?1"),
              rusqlite::params![id_str],
              match_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMatch::into_match).transpose()
  }

  async fn matches_for_user(&self, user_id: Uuid) -> Result<Vec<Match>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawMatch> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {MATCH_COLS} FROM matches
           WHERE user1_id = ?1 OR user2_id = ?1
           ORDER BY created_at DESC, match_id DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], match_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMatch::into_match).collect()
  }

  async fn active_match_for_pair(
    &self,
    a: Uuid,
    b: Uuid,
    now: DateTime<Utc>,
  ) -> Result<Option<Match>> {
    let key     = pair_key(a, b);
    let now_str = encode_dt(now);

    let raw: Option<RawMatch> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {MATCH_COLS} FROM matches
                 WHERE pair_key = ?1 AND expires_at > ?2
                 ORDER BY created_at DESC
                 LIMIT 1"
              ),
              rusqlite::params![key, now_str],
              match_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMatch::into_match).transpose()
  }

  // ── Messages — append-only writes ─────────────────────────────────────────

  async fn append_message(&self, input: NewMessage) -> Result<Message> {
    let message = Message {
      message_id: Uuid::new_v4(),
      match_id:   input.match_id,
      sender_id:  input.sender_id,
      content:    input.content,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(message.message_id);
    let match_str  = encode_uuid(message.match_id);
    let sender_str = encode_uuid(message.sender_id);
    let content    = message.content.clone();
    let at_str     = encode_dt(message.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO messages
             (message_id, match_id, sender_id, content, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, match_str, sender_str, content, at_str],
        )?;
        Ok(())
      })
      .await?;

    let _ = self.message_tx.send(MessageEvent {
      message_id: message.message_id,
      match_id:   message.match_id,
      sender_id:  message.sender_id,
    });

    Ok(message)
  }

  async fn get_message(&self, id: Uuid) -> Result<Option<Message>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMessage> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT message_id, match_id, sender_id, content, created_at
               FROM messages WHERE message_id = ?1",
              rusqlite::params![id_str],
              message_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMessage::into_message).transpose()
  }

  async fn messages_for_match(&self, match_id: Uuid) -> Result<Vec<Message>> {
    let match_str = encode_uuid(match_id);

    let raws: Vec<RawMessage> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT message_id, match_id, sender_id, content, created_at
           FROM messages
           WHERE match_id = ?1
           ORDER BY created_at ASC, message_id ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![match_str], message_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMessage::into_message).collect()
  }

  // ── Change feed ───────────────────────────────────────────────────────────

  fn match_feed(&self) -> MatchFeed { self.match_tx.subscribe() }

  fn message_feed(&self) -> MessageFeed { self.message_tx.subscribe() }
}
