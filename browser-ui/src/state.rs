//! Shared application state for the UI server.

use std::sync::Arc;

use browser::session::BrowseSession;
use tokio::sync::{Mutex, broadcast};
use tokio::task::AbortHandle;

use crate::fetch::PageFetcher;

/// Events broadcast to SSE clients when the session changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    PageLoaded { page: u32, rows: usize },
    FetchFailed { status: u16, message: String },
    SelectionChanged { selected_count: usize },
}

/// Session plus the handle of the fetch currently loading its page.
pub struct Shared {
    pub session: BrowseSession,
    pub in_flight: Option<AbortHandle>,
}

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<Mutex<Shared>>,
    pub fetcher: Arc<PageFetcher>,
    /// Page sizes the paginator offers.
    pub rows_per_page_options: Arc<Vec<u32>>,
    /// Broadcast sender for session change events.
    pub event_tx: Arc<broadcast::Sender<ChangeEvent>>,
}

impl AppState {
    pub fn new(
        session: BrowseSession,
        fetcher: PageFetcher,
        rows_per_page_options: Vec<u32>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            shared: Arc::new(Mutex::new(Shared {
                session,
                in_flight: None,
            })),
            fetcher: Arc::new(fetcher),
            rows_per_page_options: Arc::new(rows_per_page_options),
            event_tx: Arc::new(event_tx),
        }
    }
}
