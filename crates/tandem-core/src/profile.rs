//! Profile — the read-mostly participant record.
//!
//! Profiles are owned by the external profile editor; this engine reads them
//! for candidate selection and display, and ingests them only at the
//! boundary (seeding, tests). The id is stable and immutable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Self-reported experience tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceTier {
  Beginner,
  Intermediate,
  Advanced,
}

/// One user's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
  pub profile_id:    Uuid,
  pub display_name:  String,
  pub bio:           String,
  /// Skill tags; treated as a set. Containment checks are exact, never
  /// substring matches.
  pub skills:        Vec<String>,
  pub experience:    ExperienceTier,
  pub github_url:    Option<String>,
  pub portfolio_url: Option<String>,
  pub avatar_url:    Option<String>,
  pub created_at:    DateTime<Utc>,
}

impl Profile {
  /// Exact-containment check: every skill in `required` appears in
  /// `self.skills`.
  pub fn has_all_skills(&self, required: &[String]) -> bool {
    required
      .iter()
      .all(|req| self.skills.iter().any(|have| have == req))
  }
}

/// Input to [`crate::store::MatchStore::add_profile`].
/// `profile_id` and `created_at` are assigned by the store.
///
/// Optional fields default to empty/safe values so lenient rows from the
/// upstream profile editor decode without errors.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProfile {
  pub display_name:  String,
  #[serde(default)]
  pub bio:           String,
  #[serde(default)]
  pub skills:        Vec<String>,
  pub experience:    ExperienceTier,
  #[serde(default)]
  pub github_url:    Option<String>,
  #[serde(default)]
  pub portfolio_url: Option<String>,
  #[serde(default)]
  pub avatar_url:    Option<String>,
}

impl NewProfile {
  /// Convenience constructor with all optional fields empty.
  pub fn new(display_name: impl Into<String>, experience: ExperienceTier) -> Self {
    Self {
      display_name:  display_name.into(),
      bio:           String::new(),
      skills:        Vec::new(),
      experience,
      github_url:    None,
      portfolio_url: None,
      avatar_url:    None,
    }
  }
}
