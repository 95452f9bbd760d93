//! # Time Utilities

use chrono::{DateTime, Utc};

/// Current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Current time as Unix seconds, the unit token claims are expressed in.
pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}
