//! Test-only helpers for constructing catalog pages and an in-memory source.

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};

use crate::core::pagination::{PageWindow, total_pages};
use crate::core::types::{Artwork, ArtworksPage, Pagination, RecordId};
use crate::io::source::{DataSource, FetchError};

/// Create a deterministic artwork with a title derived from its id.
pub fn artwork(id: u64) -> Artwork {
    Artwork {
        id: RecordId(id),
        title: Some(format!("Artwork {id}")),
        place_of_origin: None,
        artist_display: None,
        inscriptions: None,
        date_start: None,
        date_end: None,
    }
}

/// Page rows in the given order.
pub fn page(ids: &[u64]) -> Vec<Artwork> {
    ids.iter().copied().map(artwork).collect()
}

pub fn id_set(ids: &[u64]) -> BTreeSet<RecordId> {
    ids.iter().copied().map(RecordId).collect()
}

/// API response carrying `ids` as the page and `total` as the catalog size.
pub fn api_page(ids: &[u64], total: u64) -> ArtworksPage {
    ArtworksPage {
        pagination: Pagination {
            total,
            limit: ids.len() as u64,
            offset: 0,
            total_pages: 0,
            current_page: 1,
        },
        data: page(ids),
    }
}

/// In-memory catalog of artworks with ids `1..=total`.
///
/// Queued failures are returned (one per call) before any page is served.
pub struct MemorySource {
    total: u64,
    failures: RefCell<VecDeque<FetchError>>,
    requests: RefCell<Vec<PageWindow>>,
}

impl MemorySource {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            failures: RefCell::new(VecDeque::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Fail the next fetch with `err`.
    pub fn fail_next(&self, err: FetchError) {
        self.failures.borrow_mut().push_back(err);
    }

    /// Windows requested so far, in call order.
    pub fn requests(&self) -> Vec<PageWindow> {
        self.requests.borrow().clone()
    }
}

impl DataSource for MemorySource {
    fn fetch_page(&self, window: &PageWindow) -> Result<ArtworksPage, FetchError> {
        self.requests.borrow_mut().push(*window);
        if let Some(err) = self.failures.borrow_mut().pop_front() {
            return Err(err);
        }

        let offset = window.first_row_offset();
        let end = (offset + u64::from(window.rows_per_page())).min(self.total);
        let data = (offset..end).map(|idx| artwork(idx + 1)).collect();
        Ok(ArtworksPage {
            pagination: Pagination {
                total: self.total,
                limit: u64::from(window.rows_per_page()),
                offset,
                total_pages: total_pages(self.total, window.rows_per_page()),
                current_page: u64::from(window.page()),
            },
            data,
        })
    }
}
