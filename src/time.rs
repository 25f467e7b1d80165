use chrono::{DateTime, Utc};

use crate::polyfill::runtime;

/// Current time, used when a lifecycle event carries no timestamp.
pub fn now_utc() -> DateTime<Utc> {
    runtime::now_utc()
}
