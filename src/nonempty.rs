//! Override resolution: a caller value wins unless it is the zero value of
//! its type.

use chrono::{DateTime, Duration, Utc};

use crate::models::TileStatus;

pub fn string(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

pub fn int64(value: i64, default: i64) -> i64 {
    if value == 0 {
        default
    } else {
        value
    }
}

pub fn time(value: Option<DateTime<Utc>>, default: DateTime<Utc>) -> DateTime<Utc> {
    value.unwrap_or(default)
}

pub fn duration(value: Duration, default: Duration) -> Duration {
    if value == Duration::zero() {
        default
    } else {
        value
    }
}

/// `TileStatus::Unknown` is the unset status.
pub fn status(value: TileStatus, default: TileStatus) -> TileStatus {
    if value == TileStatus::Unknown {
        default
    } else {
        value
    }
}
