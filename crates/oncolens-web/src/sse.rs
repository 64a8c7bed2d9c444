//! `GET /api/events`: live feed of finished analyses.
//!
//! Every completed `/api/analyze` call emits an `analysis_completed` event
//! (analysis type, model, result count, elapsed ms) and every batch emits a
//! `batch_completed` event (document and failure counts). The SSE event name is
//! the event kind and the data is the JSON-serialized [`AppEvent`]. Clients can
//! narrow the feed with `?kind=analysis_completed` or `?kind=batch_completed`.
//! Nothing is replayed: subscribers only see events published after they connect.

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_core::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::state::{AppEvent, SharedState};

#[derive(Debug, Default, Deserialize)]
pub struct EventFilter {
    pub kind: Option<String>,
}

impl EventFilter {
    pub fn accepts(&self, event: &AppEvent) -> bool {
        self.kind.as_deref().map_or(true, |kind| kind == event.kind())
    }
}

fn to_sse_event(event: &AppEvent) -> Option<Event> {
    let data = serde_json::to_string(event).ok()?;
    Some(Event::default().event(event.kind()).data(data))
}

pub async fn sse_handler(
    State(state): State<SharedState>,
    Query(filter): Query<EventFilter>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();
    // lagged receivers drop the missed events and keep streaming
    let stream = BroadcastStream::new(rx).filter_map(move |received| {
        received
            .ok()
            .filter(|event| filter.accepts(event))
            .and_then(|event| to_sse_event(&event))
            .map(Ok)
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
