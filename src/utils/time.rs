use chrono::{DateTime, Utc};

/// current wall-clock time, used to stamp captured results
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
