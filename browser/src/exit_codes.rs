//! Stable exit codes for browser CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid arguments or configuration, or another local error.
pub const INVALID: i32 = 1;
/// The catalog page could not be fetched.
pub const FETCH_FAILED: i32 = 2;
