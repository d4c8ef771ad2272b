//! Page window bookkeeping for server-side pagination.
//!
//! Page numbers are 1-based, matching the catalog API's `page` parameter.
//! Nothing here touches selection; moving the window only changes which rows
//! get loaded next.

use minijinja::{Environment, context};
use serde::Serialize;

/// Page sizes offered by the paginator.
pub const ROWS_PER_PAGE_OPTIONS: [u32; 3] = [12, 24, 48];

pub const DEFAULT_ROWS_PER_PAGE: u32 = 12;

pub const DEFAULT_REPORT_TEMPLATE: &str =
    "Showing {{ first }} to {{ last }} of {{ total }} entries";

/// Which server page is requested, and how large pages are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    page: u32,
    rows_per_page: u32,
}

impl PageWindow {
    /// Build a window, lifting page 0 to page 1 and a zero page size to 1.
    pub fn new(page: u32, rows_per_page: u32) -> Self {
        Self {
            page: page.max(1),
            rows_per_page: rows_per_page.max(1),
        }
    }

    /// 1-based page number, never 0.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page, never 0.
    pub fn rows_per_page(&self) -> u32 {
        self.rows_per_page
    }

    /// Zero-based index of the first row on this page across the catalog.
    pub fn first_row_offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.rows_per_page)
    }

    /// Same page size, one page forward; stays put on the last known page.
    pub fn next(&self, total_records: Option<u64>) -> Self {
        let last = total_records.map(|total| total_pages(total, self.rows_per_page));
        match last {
            Some(last) if u64::from(self.page) >= last => *self,
            _ => Self::new(self.page.saturating_add(1), self.rows_per_page),
        }
    }

    /// Same page size, one page back; stays on page 1.
    pub fn prev(&self) -> Self {
        Self::new(self.page.saturating_sub(1), self.rows_per_page)
    }

    /// Same page index, different page size.
    pub fn with_rows_per_page(&self, rows_per_page: u32) -> Self {
        Self::new(self.page, rows_per_page)
    }
}

/// Number of pages needed for `total` records; 0 for an empty catalog.
pub fn total_pages(total: u64, rows_per_page: u32) -> u64 {
    total.div_ceil(u64::from(rows_per_page.max(1)))
}

/// True if `rows_per_page` is one of the paginator's options.
pub fn is_offered_page_size(rows_per_page: u32, options: &[u32]) -> bool {
    options.contains(&rows_per_page)
}

/// 1-based row range shown on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageReport {
    pub first: u64,
    pub last: u64,
    pub total: u64,
}

impl PageReport {
    pub fn new(window: &PageWindow, rows_on_page: usize, total: u64) -> Self {
        let offset = window.first_row_offset();
        if rows_on_page == 0 {
            return Self {
                first: 0,
                last: 0,
                total,
            };
        }
        Self {
            first: offset + 1,
            last: offset + rows_on_page as u64,
            total,
        }
    }
}

/// Renders `PageReport` through a user-configurable template.
#[derive(Debug, Clone)]
pub struct ReportTemplate {
    source: String,
}

impl ReportTemplate {
    /// Compile-check `source` and wrap it.
    pub fn parse(source: &str) -> Result<Self, minijinja::Error> {
        let env = Environment::new();
        env.template_from_str(source)?;
        Ok(Self {
            source: source.to_string(),
        })
    }

    pub fn render(&self, report: &PageReport) -> Result<String, minijinja::Error> {
        let env = Environment::new();
        env.render_str(
            &self.source,
            context! {
                first => report.first,
                last => report.last,
                total => report.total,
            },
        )
    }
}

impl Default for ReportTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_REPORT_TEMPLATE.to_string(),
        }
    }
}
