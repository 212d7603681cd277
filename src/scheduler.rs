//! Spaced-repetition scheduling.
//!
//! Intervals grow with mastery and shrink with mistakes; the next review is
//! always at least one day out.

use chrono::{DateTime, Duration, Utc};

const MIN_INTERVAL_DAYS: i64 = 1;

pub fn base_interval_days(mastery_level: i64) -> i64 {
    if mastery_level > 80 {
        7
    } else if mastery_level > 60 {
        5
    } else if mastery_level > 40 {
        3
    } else if mastery_level > 20 {
        2
    } else {
        1
    }
}

/// Mistakes pull the review closer; they never push it past the base tier.
pub fn interval_days(mastery_level: i64, forget_count: i64) -> i64 {
    base_interval_days(mastery_level)
        .saturating_sub(forget_count.max(0))
        .max(MIN_INTERVAL_DAYS)
}

pub fn next_review(mastery_level: i64, forget_count: i64, now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(interval_days(mastery_level, forget_count))
}
