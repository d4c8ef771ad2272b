//! I/O helpers for the browser: configuration and catalog access.

pub mod api;
pub mod config;
pub mod source;
