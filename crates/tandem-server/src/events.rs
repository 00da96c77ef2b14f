//! Server-sent event streams.
//!
//! Both streams end when the client disconnects; dropping the response
//! drops the underlying feed subscription, so no per-client state outlives
//! the connection.

use std::convert::Infallible;

use axum::{
  extract::{Path, State},
  response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, stream};
use serde::Serialize;
use tandem_core::{profile::Profile, store::MatchStore};
use tandem_engine::{NavigationIntent, chat::ChatSession, notifier::MatchNotifier};
use tracing::error;
use uuid::Uuid;

use crate::{
  AppState, error::ApiError, extract::CurrentUser, matches::ChatEntryBody,
};

#[derive(Debug, Serialize)]
struct MatchEventBody {
  match_id: Uuid,
  with:     Profile,
  navigate: NavigationIntent,
}

/// `GET /events/matches`
///
/// One `match` event per match someone else initiates with the current
/// user, each delivered at most once per connection.
pub async fn match_stream<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
  S: MatchStore + Clone + 'static,
{
  let notifier = MatchNotifier::new(state.store.clone(), user.0);
  let stream = stream::unfold(notifier, |mut notifier| async move {
    loop {
      match notifier.next().await {
        Ok(Some(note)) => {
          let body = MatchEventBody {
            match_id: note.match_id,
            with:     note.with,
            navigate: note.navigate,
          };
          match Event::default().event("match").json_data(&body) {
            Ok(event) => return Some((Ok(event), notifier)),
            Err(err) => {
              error!(%err, "failed to encode match event");
              continue;
            }
          }
        }
        Ok(None) => return None,
        Err(err) => {
          error!(%err, "match stream failed");
          return None;
        }
      }
    }
  });
  Sse::new(stream).keep_alive(KeepAlive::default())
}

/// `GET /matches/:id/events`
///
/// One `message` event per new message in the match, starting after the
/// history that `GET /matches/:id/messages` returns. Participants only;
/// the same 404 shape as the message routes.
pub async fn message_stream<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError>
where
  S: MatchStore + Clone + 'static,
{
  let session = ChatSession::open(state.store.clone(), user.0, &id).await?;
  let stream = stream::unfold(session, |mut session| async move {
    loop {
      match session.next_message().await {
        Ok(Some(entry)) => {
          let body = ChatEntryBody::from(entry);
          match Event::default().event("message").json_data(&body) {
            Ok(event) => return Some((Ok(event), session)),
            Err(err) => {
              error!(%err, "failed to encode message event");
              continue;
            }
          }
        }
        Ok(None) => return None,
        Err(err) => {
          error!(%err, "message stream failed");
          return None;
        }
      }
    }
  });
  Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
