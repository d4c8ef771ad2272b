//! Paginated browser over a remote artwork catalog with persistent
//! cross-page selection.
//!
//! Only one server page is ever held in memory, yet row selection must
//! survive paging. The crate is split accordingly:
//!
//! - **[`core`]**: Pure, deterministic logic (selection store, page
//!   reconciler, pagination). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (configuration files, catalog
//!   HTTP requests). Isolated behind the [`io::source::DataSource`] trait.
//!
//! [`session`] couples the two for one browsing session, and [`browse`]
//! drives a session from the terminal.

pub mod browse;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
