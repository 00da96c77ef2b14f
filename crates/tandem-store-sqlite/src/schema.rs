//! SQL schema for the Tandem SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS profiles (
    profile_id    TEXT PRIMARY KEY,
    display_name  TEXT NOT NULL,
    bio           TEXT NOT NULL DEFAULT '',
    skills        TEXT NOT NULL DEFAULT '[]',  -- JSON array of skill tags
    experience    TEXT NOT NULL,               -- 'beginner' | 'intermediate' | 'advanced'
    github_url    TEXT,
    portfolio_url TEXT,
    avatar_url    TEXT,
    created_at    TEXT NOT NULL                -- ISO 8601 UTC; server-assigned
);

-- Swipes are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS swipes (
    swipe_id   TEXT PRIMARY KEY,
    swiper_id  TEXT NOT NULL REFERENCES profiles(profile_id),
    target_id  TEXT NOT NULL REFERENCES profiles(profile_id),
    direction  TEXT NOT NULL,                  -- 'left' | 'right'
    created_at TEXT NOT NULL,
    UNIQUE (swiper_id, target_id),
    CHECK  (swiper_id != target_id)
);

-- Matches are append-only; expiry is derived from expires_at at read time,
-- never written back. pair_key is the canonical (min, max) ordering of the
-- two participant ids; the conditional insert in store.rs guarantees at
-- most one unexpired row per pair_key.
CREATE TABLE IF NOT EXISTS matches (
    match_id     TEXT PRIMARY KEY,
    user1_id     TEXT NOT NULL REFERENCES profiles(profile_id),
    user2_id     TEXT NOT NULL REFERENCES profiles(profile_id),
    initiator_id TEXT NOT NULL,
    pair_key     TEXT NOT NULL,
    status       TEXT NOT NULL DEFAULT 'initiated',
    created_at   TEXT NOT NULL,
    expires_at   TEXT NOT NULL,
    CHECK (user1_id != user2_id)
);

CREATE TABLE IF NOT EXISTS messages (
    message_id TEXT PRIMARY KEY,
    match_id   TEXT NOT NULL REFERENCES matches(match_id),
    sender_id  TEXT NOT NULL REFERENCES profiles(profile_id),
    content    TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS profiles_created_idx ON profiles(created_at);
CREATE INDEX IF NOT EXISTS swipes_swiper_idx    ON swipes(swiper_id);
CREATE INDEX IF NOT EXISTS matches_pair_idx     ON matches(pair_key, expires_at);
CREATE INDEX IF NOT EXISTS matches_user1_idx    ON matches(user1_id);
CREATE INDEX IF NOT EXISTS matches_user2_idx    ON matches(user2_id);
CREATE INDEX IF NOT EXISTS messages_match_idx   ON messages(match_id, created_at, message_id);

PRAGMA user_version = 1;
";
