//! Browse session: one loaded page, its pagination, and the session-wide
//! selection.
//!
//! Navigation and selection are kept apart. Navigating only changes which
//! page gets loaded next; selection changes only through the reconciler,
//! always against the rows the session currently holds.
//!
//! Every navigation hands out a [`FetchTicket`] tagged with a new generation.
//! A fetch completion is applied only if its ticket is still the latest, so a
//! slow response for a page the user already left can never overwrite the
//! page being shown.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::pagination::{PageReport, PageWindow, ReportTemplate, total_pages};
use crate::core::reconcile::{apply_page_selection, apply_select_first_n_on_page};
use crate::core::select_input::{SelectFirstInput, helper_text, is_disabled};
use crate::core::selection::SelectionState;
use crate::core::types::{Artwork, ArtworksPage, RecordId};
use crate::io::config::BrowserConfig;
use crate::io::source::FetchError;

/// Identifies one page request issued by [`BrowseSession::navigate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub window: PageWindow,
}

/// What happened when a fetch completion was handed back to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Page replaced the previously loaded rows.
    Loaded { rows: usize, total: u64 },
    /// Fetch failed; the user-facing message is now the session error.
    Failed(FetchError),
    /// A newer request exists, or the request was cancelled. Nothing changed.
    Superseded,
}

/// A selection edit was made against a page load that is no longer current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("selection targets page load {requested}, but page load {current} is current")]
pub struct StaleSelection {
    pub requested: u64,
    pub current: u64,
}

#[derive(Debug, Clone)]
pub struct BrowseSession {
    window: PageWindow,
    rows: Vec<Artwork>,
    total_records: Option<u64>,
    loading: bool,
    error: Option<String>,
    selection: SelectionState,
    select_input: SelectFirstInput,
    generation: u64,
    report_template: ReportTemplate,
}

impl BrowseSession {
    /// Fresh session on page 1 with nothing loaded and nothing selected.
    pub fn new(rows_per_page: u32, report_template: ReportTemplate) -> Self {
        Self {
            window: PageWindow::new(1, rows_per_page),
            rows: Vec::new(),
            total_records: None,
            loading: false,
            error: None,
            selection: SelectionState::new(),
            select_input: SelectFirstInput::new(),
            generation: 0,
            report_template,
        }
    }

    pub fn from_config(cfg: &BrowserConfig) -> anyhow::Result<Self> {
        Ok(Self::new(cfg.rows_per_page, cfg.report_template()?))
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    pub fn rows(&self) -> &[Artwork] {
        &self.rows
    }

    /// Catalog-wide record count from the last successful fetch.
    pub fn total_records(&self) -> Option<u64> {
        self.total_records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Generation of the latest navigation; bumped on every new fetch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start loading `window`. Supersedes any request still in flight.
    pub fn navigate(&mut self, window: PageWindow) -> FetchTicket {
        self.generation += 1;
        self.window = window;
        self.loading = true;
        self.error = None;
        debug!(
            generation = self.generation,
            page = window.page(),
            rows_per_page = window.rows_per_page(),
            "navigate"
        );
        FetchTicket {
            generation: self.generation,
            window,
        }
    }

    pub fn go_to_page(&mut self, page: u32) -> FetchTicket {
        let window = PageWindow::new(page, self.window.rows_per_page());
        self.navigate(window)
    }

    pub fn next_page(&mut self) -> FetchTicket {
        let window = self.window.next(self.total_records);
        self.navigate(window)
    }

    pub fn prev_page(&mut self) -> FetchTicket {
        let window = self.window.prev();
        self.navigate(window)
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: u32) -> FetchTicket {
        let window = self.window.with_rows_per_page(rows_per_page);
        self.navigate(window)
    }

    /// Re-issue the current request, e.g. after a transient failure.
    pub fn refresh(&mut self) -> FetchTicket {
        self.navigate(self.window)
    }

    /// True if `ticket` belongs to the most recent navigation.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Hand a fetch result back to the session.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<ArtworksPage, FetchError>,
    ) -> FetchOutcome {
        if !self.is_current(&ticket) {
            debug!(
                generation = ticket.generation,
                latest = self.generation,
                "discarding superseded fetch"
            );
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(page) => {
                self.loading = false;
                self.error = None;
                self.rows = page.data;
                self.total_records = Some(page.pagination.total);
                FetchOutcome::Loaded {
                    rows: self.rows.len(),
                    total: page.pagination.total,
                }
            }
            Err(err) if err.is_cancelled() => FetchOutcome::Superseded,
            Err(err) => {
                warn!(status = err.status(), error = %err, "page fetch failed");
                self.loading = false;
                self.error = Some(err.user_message());
                self.rows.clear();
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Replace the checked set of the current page (full set, not a delta).
    pub fn set_checked(&mut self, checked_on_page: &BTreeSet<RecordId>) {
        self.selection = apply_page_selection(&self.rows, checked_on_page, &self.selection);
    }

    /// Like [`set_checked`](Self::set_checked), but only if `generation` is
    /// still the latest navigation. A client holding an older view would
    /// otherwise apply its checkboxes to a different page's rows.
    pub fn set_checked_for(
        &mut self,
        generation: u64,
        checked_on_page: &BTreeSet<RecordId>,
    ) -> Result<(), StaleSelection> {
        self.ensure_generation(generation)?;
        self.set_checked(checked_on_page);
        Ok(())
    }

    fn ensure_generation(&self, generation: u64) -> Result<(), StaleSelection> {
        if generation != self.generation {
            debug!(requested = generation, current = self.generation, "stale selection edit");
            return Err(StaleSelection {
                requested: generation,
                current: self.generation,
            });
        }
        Ok(())
    }

    /// Flip one checkbox on the current page.
    ///
    /// Returns false, leaving the selection alone, if `id` is not on the page.
    pub fn toggle(&mut self, id: RecordId) -> bool {
        if !self.rows.iter().any(|row| row.id == id) {
            return false;
        }
        let mut checked: BTreeSet<RecordId> = self
            .selection
            .selected_rows_on_page(&self.rows)
            .iter()
            .map(|row| row.id)
            .collect();
        if !checked.remove(&id) {
            checked.insert(id);
        }
        self.set_checked(&checked);
        true
    }

    /// Uncheck every row on the current page.
    pub fn clear_page(&mut self) {
        self.set_checked(&BTreeSet::new());
    }

    /// Check the first `n` rows of the page and uncheck the rest.
    pub fn select_first_n(&mut self, n: i64) {
        self.selection = apply_select_first_n_on_page(&self.rows, n, &self.selection);
    }

    /// [`select_first_n`](Self::select_first_n) guarded by the page generation.
    pub fn select_first_n_for(&mut self, generation: u64, n: i64) -> Result<(), StaleSelection> {
        self.ensure_generation(generation)?;
        self.select_first_n(n);
        Ok(())
    }

    pub fn select_input_mut(&mut self) -> &mut SelectFirstInput {
        &mut self.select_input
    }

    /// Apply the entered count and clear the entry. No-op on an empty page.
    pub fn apply_select_input(&mut self) {
        if is_disabled(self.rows.len()) {
            return;
        }
        let n = self.select_input.take();
        self.select_first_n(n);
    }

    /// Rows of the current page that render as checked.
    pub fn selected_rows(&self) -> Vec<Artwork> {
        self.selection.selected_rows_on_page(&self.rows)
    }

    pub fn is_row_checked(&self, id: RecordId) -> bool {
        self.selection.is_selected(id)
    }

    pub fn effective_selected_count(&self) -> usize {
        self.selection.effective_selected_count()
    }

    pub fn page_report(&self) -> PageReport {
        PageReport::new(
            &self.window,
            self.rows.len(),
            self.total_records.unwrap_or(0),
        )
    }

    /// Rendered row range line; falls back to the default wording if the
    /// configured template fails at render time.
    pub fn report_text(&self) -> String {
        let report = self.page_report();
        self.report_template.render(&report).unwrap_or_else(|err| {
            warn!(error = %err, "page report template failed to render");
            format!(
                "Showing {} to {} of {} entries",
                report.first, report.last, report.total
            )
        })
    }

    /// Serializable snapshot for rendering.
    pub fn view(&self) -> SessionView {
        let rows = self
            .rows
            .iter()
            .map(|row| RowView {
                checked: self.is_row_checked(row.id),
                artwork: row.clone(),
            })
            .collect();
        let total = self.total_records.unwrap_or(0);
        SessionView {
            generation: self.generation,
            page: self.window.page(),
            rows_per_page: self.window.rows_per_page(),
            total_records: total,
            total_pages: total_pages(total, self.window.rows_per_page()),
            rows,
            report: self.report_text(),
            selected_count: self.effective_selected_count(),
            loading: self.loading,
            error: self.error.clone(),
            select_first: SelectFirstView {
                max: self.rows.len(),
                helper_text: helper_text(self.rows.len()),
                disabled: is_disabled(self.rows.len()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    /// Echo back with selection edits so they land on the page shown.
    pub generation: u64,
    pub page: u32,
    pub rows_per_page: u32,
    pub total_records: u64,
    pub total_pages: u64,
    pub rows: Vec<RowView>,
    pub report: String,
    pub selected_count: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub select_first: SelectFirstView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    #[serde(flatten)]
    pub artwork: Artwork,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectFirstView {
    pub max: usize,
    pub helper_text: String,
    pub disabled: bool,
}
