//! Modification window resolution.

use chrono::{Duration, Utc};

/// Lower-bound Unix timestamp for the modified-record listing.
///
/// `recent_only` selects "now minus one day" (UTC), matching a daily
/// incremental invocation cadence; otherwise the window opens at the epoch
/// and every record is a candidate. The one-day width is deliberately not
/// configurable — a full resync is the fallback, not a wider window.
pub fn modified_since(recent_only: bool) -> i64 {
    if recent_only {
        (Utc::now() - Duration::days(1)).timestamp()
    } else {
        0
    }
}
