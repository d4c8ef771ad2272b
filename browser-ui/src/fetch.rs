//! Async catalog fetches, superseded by newer navigation.

use browser::core::pagination::PageWindow;
use browser::core::types::ArtworksPage;
use browser::io::api::{check_status, decode_page, page_url};
use browser::io::config::BrowserConfig;
use browser::io::source::FetchError;
use browser::session::{FetchOutcome, FetchTicket};
use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::{debug, info};

use crate::state::{AppState, ChangeEvent, Shared};

/// Async client for the artworks endpoint.
pub struct PageFetcher {
    client: Client,
    api_base: String,
}

impl PageFetcher {
    pub fn new(cfg: &BrowserConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(cfg.request_timeout())
            .user_agent(cfg.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            api_base: cfg.api_base.clone(),
        })
    }

    pub async fn fetch_page(&self, window: &PageWindow) -> Result<ArtworksPage, FetchError> {
        let url = page_url(&self.api_base, window)?;
        debug!(%url, "fetching artworks page");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        check_status(response.status())?;
        let body = response.bytes().await?;
        decode_page(&body)
    }
}

/// Spawn the fetch for `ticket` and abort whatever fetch was still running.
///
/// Must be called while holding the shared lock that issued `ticket`, so the
/// in-flight handle always belongs to the latest generation.
pub fn spawn_fetch(state: &AppState, shared: &mut Shared, ticket: FetchTicket) {
    let task_state = state.clone();
    let handle = tokio::spawn(async move {
        let result = task_state.fetcher.fetch_page(&ticket.window).await;
        let outcome = {
            let mut shared = task_state.shared.lock().await;
            let outcome = shared.session.complete_fetch(ticket, result);
            if matches!(outcome, FetchOutcome::Loaded { .. } | FetchOutcome::Failed(_)) {
                shared.in_flight = None;
            }
            outcome
        };
        publish_outcome(&task_state, &ticket, &outcome);
    });

    if let Some(previous) = shared.in_flight.replace(handle.abort_handle()) {
        debug!(generation = ticket.generation, "aborting superseded fetch");
        previous.abort();
    }
}

fn publish_outcome(state: &AppState, ticket: &FetchTicket, outcome: &FetchOutcome) {
    let event = match outcome {
        FetchOutcome::Loaded { rows, total } => {
            info!(page = ticket.window.page(), rows, total, "page loaded");
            ChangeEvent::PageLoaded {
                page: ticket.window.page(),
                rows: *rows,
            }
        }
        FetchOutcome::Failed(err) => ChangeEvent::FetchFailed {
            status: err.status(),
            message: err.user_message(),
        },
        FetchOutcome::Superseded => return,
    };
    let _ = state.event_tx.send(event);
}
