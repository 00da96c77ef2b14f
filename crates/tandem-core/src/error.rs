//! Error types for `tandem-core`.
//!
//! These cover local validation only — rejections that must happen before
//! any store round-trip. Backend failures live in each backend's own error
//! type behind [`crate::store::MatchStore::Error`].

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("cannot swipe on yourself")]
  SelfSwipe,

  #[error("cannot match a user with themselves")]
  SelfMatch,

  #[error("message content is empty")]
  EmptyMessage,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
