//! Utility modules.

/// Keeps response bodies and tokens out of logs.
pub mod log_sanitizer;
