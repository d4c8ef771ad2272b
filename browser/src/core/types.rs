//! Catalog record types shared by the selection core and the data source.
//!
//! These mirror the catalog API's JSON shapes. The core only ever looks at
//! `Artwork::id`; the remaining attributes are display data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of one catalog record, unique across all pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One artwork row as returned by the catalog API.
///
/// Every attribute except `id` is nullable upstream; absent fields decode as
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: RecordId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub place_of_origin: Option<String>,
    #[serde(default)]
    pub artist_display: Option<String>,
    #[serde(default)]
    pub inscriptions: Option<String>,
    #[serde(default)]
    pub date_start: Option<i64>,
    #[serde(default)]
    pub date_end: Option<i64>,
}

/// Pagination block of an API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Pagination {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

/// One server page plus the catalog-wide record count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworksPage {
    pub pagination: Pagination,
    pub data: Vec<Artwork>,
}

/// Fields requested from the API, in column order.
pub const ARTWORK_FIELDS: [&str; 7] = [
    "id",
    "title",
    "place_of_origin",
    "artist_display",
    "inscriptions",
    "date_start",
    "date_end",
];
