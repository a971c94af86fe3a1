//! Time utilities for vcbox.
//!
//! Record timestamps are RFC 3339 strings, the form credential and message
//! documents carry them in.

/// Return the current UTC time as an RFC 3339 string with second precision.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
