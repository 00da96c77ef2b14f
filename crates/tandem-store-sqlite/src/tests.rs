//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, Utc};
use tandem_core::{
  pairing::{MATCH_TTL_DAYS, NewMatch},
  message::NewMessage,
  profile::{ExperienceTier, NewProfile, Profile},
  store::{CandidateQuery, MatchStore},
  swipe::{NewSwipe, SwipeDirection},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn profile(s: &SqliteStore, name: &str, skills: &[&str]) -> Profile {
  let mut input = NewProfile::new(name, ExperienceTier::Intermediate);
  input.skills = skills.iter().map(|sk| sk.to_string()).collect();
  s.add_profile(input).await.unwrap()
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_profile() {
  let s = store().await;

  let alice = profile(&s, "Alice", &["rust", "sql"]).await;
  let fetched = s.get_profile(alice.profile_id).await.unwrap().unwrap();

  assert_eq!(fetched.profile_id, alice.profile_id);
  assert_eq!(fetched.display_name, "Alice");
  assert_eq!(fetched.skills, &["rust", "sql"]);
  assert_eq!(fetched.experience, ExperienceTier::Intermediate);
}

#[tokio::test]
async fn get_profile_missing_returns_none() {
  let s = store().await;
  let result = s.get_profile(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn optional_profile_fields_roundtrip() {
  let s = store().await;

  let mut input = NewProfile::new("Bob", ExperienceTier::Advanced);
  input.bio = "systems person".into();
  input.github_url = Some("https://github.com/bob".into());
  input.avatar_url = Some("https://cdn.example.com/bob.png".into());

  let bob = s.add_profile(input).await.unwrap();
  let fetched = s.get_profile(bob.profile_id).await.unwrap().unwrap();

  assert_eq!(fetched.bio, "systems person");
  assert_eq!(fetched.github_url.as_deref(), Some("https://github.com/bob"));
  assert_eq!(fetched.portfolio_url, None);
  assert_eq!(
    fetched.avatar_url.as_deref(),
    Some("https://cdn.example.com/bob.png")
  );
}

// ─── Candidate listing ───────────────────────────────────────────────────────

#[tokio::test]
async fn candidates_are_newest_first() {
  let s = store().await;
  let first = profile(&s, "First", &[]).await;
  let second = profile(&s, "Second", &[]).await;
  let third = profile(&s, "Third", &[]).await;

  let listed = s.list_candidates(&CandidateQuery::default()).await.unwrap();
  let ids: Vec<_> = listed.iter().map(|p| p.profile_id).collect();
  assert_eq!(ids, vec![third.profile_id, second.profile_id, first.profile_id]);
}

#[tokio::test]
async fn candidates_respect_exclusion() {
  let s = store().await;
  let keep = profile(&s, "Keep", &[]).await;
  let drop1 = profile(&s, "DropA", &[]).await;
  let drop2 = profile(&s, "DropB", &[]).await;

  let listed = s
    .list_candidates(&CandidateQuery {
      exclude: vec![drop1.profile_id, drop2.profile_id],
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].profile_id, keep.profile_id);
}

#[tokio::test]
async fn candidates_filter_by_skill_superset() {
  let s = store().await;
  profile(&s, "Frontend", &["typescript", "css"]).await;
  let full = profile(&s, "FullStack", &["typescript", "rust", "css"]).await;
  profile(&s, "Backend", &["rust"]).await;

  let listed = s
    .list_candidates(&CandidateQuery {
      required_skills: vec!["typescript".into(), "rust".into()],
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].profile_id, full.profile_id);
}

#[tokio::test]
async fn candidate_limit_applies_after_skill_filter() {
  let s = store().await;
  profile(&s, "NoSkill", &[]).await;
  let rustacean = profile(&s, "Rustacean", &["rust"]).await;

  // The newest profile has no matching skills; limit 1 must still return
  // the older matching one rather than an empty set.
  let older = profile(&s, "Plain", &[]).await;
  assert_ne!(older.profile_id, rustacean.profile_id);

  let listed = s
    .list_candidates(&CandidateQuery {
      required_skills: vec!["rust".into()],
      limit: Some(1),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].profile_id, rustacean.profile_id);
}

// ─── Swipes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_swipe_and_list_targets() {
  let s = store().await;
  let alice = profile(&s, "Alice", &[]).await;
  let bob = profile(&s, "Bob", &[]).await;
  let carol = profile(&s, "Carol", &[]).await;

  let rec = s
    .record_swipe(
      NewSwipe::new(alice.profile_id, bob.profile_id, SwipeDirection::Right)
        .unwrap(),
    )
    .await
    .unwrap();
  assert!(!rec.is_duplicate());

  s.record_swipe(
    NewSwipe::new(alice.profile_id, carol.profile_id, SwipeDirection::Left)
      .unwrap(),
  )
  .await
  .unwrap();

  let mut targets = s.swiped_targets(alice.profile_id).await.unwrap();
  targets.sort();
  let mut expected = vec![bob.profile_id, carol.profile_id];
  expected.sort();
  assert_eq!(targets, expected);

  // Bob swiped on no one.
  assert!(s.swiped_targets(bob.profile_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_swipe_returns_original_row() {
  let s = store().await;
  let alice = profile(&s, "Alice", &[]).await;
  let bob = profile(&s, "Bob", &[]).await;

  let first = s
    .record_swipe(
      NewSwipe::new(alice.profile_id, bob.profile_id, SwipeDirection::Left)
        .unwrap(),
    )
    .await
    .unwrap()
    .into_swipe();

  // A second swipe, even in the other direction, changes nothing.
  let repeat = s
    .record_swipe(
      NewSwipe::new(alice.profile_id, bob.profile_id, SwipeDirection::Right)
        .unwrap(),
    )
    .await
    .unwrap();

  assert!(repeat.is_duplicate());
  assert_eq!(repeat.swipe().swipe_id, first.swipe_id);
  assert_eq!(repeat.swipe().direction, SwipeDirection::Left);
}

// ─── Matches ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_match_sets_initiator_and_expiry() {
  let s = store().await;
  let alice = profile(&s, "Alice", &[]).await;
  let bob = profile(&s, "Bob", &[]).await;

  let creation = s
    .create_match(NewMatch::new(alice.profile_id, bob.profile_id).unwrap())
    .await
    .unwrap();
  assert!(creation.was_created());

  let m = creation.into_match();
  assert_eq!(m.user1_id, alice.profile_id);
  assert_eq!(m.user2_id, bob.profile_id);
  assert_eq!(m.initiator_id, alice.profile_id);
  assert_eq!(m.expires_at, m.created_at + Duration::days(MATCH_TTL_DAYS));

  let fetched = s.get_match(m.match_id).await.unwrap().unwrap();
  assert_eq!(fetched.match_id, m.match_id);
}

#[tokio::test]
async fn second_insert_for_pair_returns_existing() {
  let s = store().await;
  let alice = profile(&s, "Alice", &[]).await;
  let bob = profile(&s, "Bob", &[]).await;

  let first = s
    .create_match(NewMatch::new(alice.profile_id, bob.profile_id).unwrap())
    .await
    .unwrap()
    .into_match();

  // Same pair, reversed order: the racing counterpart.
  let second = s
    .create_match(NewMatch::new(bob.profile_id, alice.profile_id).unwrap())
    .await
    .unwrap();

  assert!(!second.was_created());
  assert_eq!(second.record().match_id, first.match_id);
  assert_eq!(second.record().initiator_id, alice.profile_id);

  // Exactly one row survives for the pair.
  let for_alice = s.matches_for_user(alice.profile_id).await.unwrap();
  assert_eq!(for_alice.len(), 1);
}

#[tokio::test]
async fn active_match_for_pair_ignores_argument_order() {
  let s = store().await;
  let alice = profile(&s, "Alice", &[]).await;
  let bob = profile(&s, "Bob", &[]).await;

  let m = s
    .create_match(NewMatch::new(alice.profile_id, bob.profile_id).unwrap())
    .await
    .unwrap()
    .into_match();

  let now = Utc::now();
  let found = s
    .active_match_for_pair(bob.profile_id, alice.profile_id, now)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.match_id, m.match_id);
}

#[tokio::test]
async fn match_expiry_is_derived_at_read_time() {
  let s = store().await;
  let alice = profile(&s, "Alice", &[]).await;
  let bob = profile(&s, "Bob", &[]).await;

  s.create_match(NewMatch::new(alice.profile_id, bob.profile_id).unwrap())
    .await
    .unwrap();

  let after_ttl = Utc::now() + Duration::days(MATCH_TTL_DAYS + 1);
  let found = s
    .active_match_for_pair(alice.profile_id, bob.profile_id, after_ttl)
    .await
    .unwrap();
  assert!(found.is_none());

  // The row itself is never deleted.
  assert_eq!(s.matches_for_user(alice.profile_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn match_feed_announces_created_only() {
  let s = store().await;
  let alice = profile(&s, "Alice", &[]).await;
  let bob = profile(&s, "Bob", &[]).await;

  let mut feed = s.match_feed();

  let m = s
    .create_match(NewMatch::new(alice.profile_id, bob.profile_id).unwrap())
    .await
    .unwrap()
    .into_match();

  let event = feed.recv().await.unwrap();
  assert_eq!(event.match_id, m.match_id);
  assert_eq!(event.initiator_id, alice.profile_id);

  // Losing the race publishes nothing; the winner's event already covers
  // the pair.
  s.create_match(NewMatch::new(bob.profile_id, alice.profile_id).unwrap())
    .await
    .unwrap();
  assert!(feed.try_recv().is_err());
}

// ─── Messages ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn messages_are_totally_ordered() {
  let s = store().await;
  let alice = profile(&s, "Alice", &[]).await;
  let bob = profile(&s, "Bob", &[]).await;
  let m = s
    .create_match(NewMatch::new(alice.profile_id, bob.profile_id).unwrap())
    .await
    .unwrap()
    .into_match();

  let first = s
    .append_message(
      NewMessage::new(m.match_id, alice.profile_id, "hi").unwrap(),
    )
    .await
    .unwrap();
  let second = s
    .append_message(
      NewMessage::new(m.match_id, bob.profile_id, "hello").unwrap(),
    )
    .await
    .unwrap();

  let loaded = s.messages_for_match(m.match_id).await.unwrap();
  let ids: Vec<_> = loaded.iter().map(|msg| msg.message_id).collect();
  assert_eq!(ids, vec![first.message_id, second.message_id]);
  assert!(loaded.windows(2).all(|w| w[0].sort_key() <= w[1].sort_key()));
}

#[tokio::test]
async fn get_message_roundtrip() {
  let s = store().await;
  let alice = profile(&s, "Alice", &[]).await;
  let bob = profile(&s, "Bob", &[]).await;
  let m = s
    .create_match(NewMatch::new(alice.profile_id, bob.profile_id).unwrap())
    .await
    .unwrap()
    .into_match();

  let sent = s
    .append_message(
      NewMessage::new(m.match_id, bob.profile_id, "  trimmed  ").unwrap(),
    )
    .await
    .unwrap();

  let fetched = s.get_message(sent.message_id).await.unwrap().unwrap();
  assert_eq!(fetched.content, "trimmed");
  assert_eq!(fetched.sender_id, bob.profile_id);
}

#[tokio::test]
async fn message_to_unknown_match_is_rejected() {
  let s = store().await;
  let alice = profile(&s, "Alice", &[]).await;

  let err = s
    .append_message(
      NewMessage::new(Uuid::new_v4(), alice.profile_id, "orphan").unwrap(),
    )
    .await;
  assert!(err.is_err());
}

#[tokio::test]
async fn message_feed_carries_match_routing() {
  let s = store().await;
  let alice = profile(&s, "Alice", &[]).await;
  let bob = profile(&s, "Bob", &[]).await;
  let m = s
    .create_match(NewMatch::new(alice.profile_id, bob.profile_id).unwrap())
    .await
    .unwrap()
    .into_match();

  let mut feed = s.message_feed();
  let sent = s
    .append_message(NewMessage::new(m.match_id, alice.profile_id, "ping").unwrap())
    .await
    .unwrap();

  let event = feed.recv().await.unwrap();
  assert_eq!(event.message_id, sent.message_id);
  assert_eq!(event.match_id, m.match_id);
  assert_eq!(event.sender_id, alice.profile_id);
}
