//! Server-Sent Events stream of session changes.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures::stream::Stream;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::warn;

use crate::state::{AppState, ChangeEvent};

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SsePayload {
    PageLoaded { page: u32, rows: usize },
    FetchFailed { status: u16, message: String },
    SelectionChanged { selected_count: usize },
}

impl From<&ChangeEvent> for SsePayload {
    fn from(event: &ChangeEvent) -> Self {
        match event {
            ChangeEvent::PageLoaded { page, rows } => SsePayload::PageLoaded {
                page: *page,
                rows: *rows,
            },
            ChangeEvent::FetchFailed { status, message } => SsePayload::FetchFailed {
                status: *status,
                message: message.clone(),
            },
            ChangeEvent::SelectionChanged { selected_count } => SsePayload::SelectionChanged {
                selected_count: *selected_count,
            },
        }
    }
}

/// SSE endpoint handler.
pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.event_tx.subscribe();

    let stream = async_stream::stream! {
        // Send initial connected event
        yield Ok(Event::default().event("connected").data("{}"));

        loop {
            match rx.recv().await {
                Ok(change_event) => {
                    let payload = SsePayload::from(&change_event);
                    if let Ok(json) = serde_json::to_string(&payload) {
                        yield Ok(Event::default().event("change").data(json));
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "SSE client lagged, some events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_tagged_by_type() {
        let json = serde_json::to_value(SsePayload::from(&ChangeEvent::FetchFailed {
            status: 0,
            message: "Network error while fetching artworks.".to_string(),
        }))
        .expect("json");

        assert_eq!(json["type"], "fetch_failed");
        assert_eq!(json["status"], 0);
        assert_eq!(json["message"], "Network error while fetching artworks.");
    }

    #[test]
    fn selection_payload_carries_count() {
        let json = serde_json::to_string(&SsePayload::from(&ChangeEvent::SelectionChanged {
            selected_count: 3,
        }))
        .expect("json");
        assert_eq!(json, r#"{"type":"selection_changed","selected_count":3}"#);
    }
}
