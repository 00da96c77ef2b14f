//! The Tandem coordination engine.
//!
//! Four units built on any [`tandem_core::store::MatchStore`] backend:
//! candidate selection, swipe arbitration, match notification, and chat
//! sessions — plus the matches overview. Each operation takes the session
//! identity as an explicit argument; there is no ambient user state.
//! Transport and rendering are the caller's responsibility.

pub mod arbiter;
pub mod chat;
pub mod error;
pub mod intent;
pub mod notifier;
pub mod roster;
pub mod selector;

pub use error::{Error, Result};
pub use intent::NavigationIntent;
