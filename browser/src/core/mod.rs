//! Deterministic, pure logic for the catalog browser.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and return new values, which keeps them testable in isolation.

pub mod pagination;
pub mod reconcile;
pub mod select_input;
pub mod selection;
pub mod types;
