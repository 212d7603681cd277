//! Health decay and status evaluation.
//!
//! Decay is pull-based: derived from `now - last_seen` on demand, never from
//! a background timer. The evaluation is pure; callers apply the returned
//! snapshot to the record.

use chrono::{DateTime, Utc};

use crate::config::DecayParams;
use crate::types::{EventRules, MemoryRecord, StatusSnapshot, WordStatus};

pub const HEALTH_MIN: i64 = 0;
pub const HEALTH_MAX: i64 = 100;
pub const HEALTHY_THRESHOLD: i64 = 80;
pub const FORGOTTEN_THRESHOLD: i64 = 50;

/// Maps a health value to its decay status. The two lowest tiers share one
/// outcome: `RescuePriority` is the floor. `Rescued` and `Mastered` are
/// reached only through successful reviews, never through decay.
pub fn status_for_health(health: i64) -> WordStatus {
    if health >= HEALTHY_THRESHOLD {
        WordStatus::Healthy
    } else if health >= FORGOTTEN_THRESHOLD {
        WordStatus::Forgotten
    } else {
        WordStatus::RescuePriority
    }
}

/// Computes the current health and status of a record at `now`.
///
/// `elapsed_days` is clamped to zero so clock skew (`now` before
/// `last_seen`) can never produce negative decay. The result is always in
/// `[0, 100]` regardless of input extremes.
pub fn evaluate(
    record: &MemoryRecord,
    now: DateTime<Utc>,
    params: &DecayParams,
    rules: Option<&EventRules>,
) -> StatusSnapshot {
    let elapsed_days = (now - record.last_seen).num_days().max(0);
    let multiplier = rules.map(|r| r.decay_multiplier).unwrap_or(1.0);

    let decay = (elapsed_days as f64 * params.daily_decay as f64
        + record.forget_count as f64 * params.mistake_decay as f64)
        * multiplier;

    let health = ((record.health as f64 - decay)
        .clamp(HEALTH_MIN as f64, HEALTH_MAX as f64))
    .floor() as i64;

    StatusSnapshot {
        health,
        status: status_for_health(health),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn record_at(health: i64, last_seen: DateTime<Utc>, forget_count: i64) -> MemoryRecord {
        MemoryRecord {
            health,
            forget_count,
            last_seen,
            ..MemoryRecord::new("word_1", last_seen)
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_ten_days_of_decay() {
        let record = record_at(100, now() - Duration::days(10), 0);
        let snapshot = evaluate(&record, now(), &DecayParams::default(), None);
        assert_eq!(snapshot.health, 50);
        assert_eq!(snapshot.status, WordStatus::Forgotten);
    }

    #[test]
    fn test_mistakes_accelerate_decay() {
        let record = record_at(100, now() - Duration::days(2), 3);
        let snapshot = evaluate(&record, now(), &DecayParams::default(), None);
        // 100 - 2*5 - 3*15 = 45
        assert_eq!(snapshot.health, 45);
        assert_eq!(snapshot.status, WordStatus::RescuePriority);
    }

    #[test]
    fn test_clock_skew_clamps_to_zero_elapsed() {
        let record = record_at(90, now() + Duration::days(3), 0);
        let snapshot = evaluate(&record, now(), &DecayParams::default(), None);
        assert_eq!(snapshot.health, 90);
        assert_eq!(snapshot.status, WordStatus::Healthy);
    }

    #[test]
    fn test_health_never_goes_negative() {
        let record = record_at(10, now() - Duration::days(365), i64::MAX / 2);
        let snapshot = evaluate(&record, now(), &DecayParams::default(), None);
        assert_eq!(snapshot.health, 0);
        assert_eq!(snapshot.status, WordStatus::RescuePriority);
    }

    #[test]
    fn test_partial_days_do_not_decay() {
        let record = record_at(100, now() - Duration::hours(23), 0);
        let snapshot = evaluate(&record, now(), &DecayParams::default(), None);
        assert_eq!(snapshot.health, 100);
    }

    #[test]
    fn test_event_scales_decay() {
        let rules = EventRules {
            decay_multiplier: 2.0,
            xp_multiplier: 1.0,
        };
        let record = record_at(100, now() - Duration::days(4), 0);
        let snapshot = evaluate(&record, now(), &DecayParams::default(), Some(&rules));
        assert_eq!(snapshot.health, 60);
    }

    #[test]
    fn test_evaluation_is_pure_and_repeatable() {
        let record = record_at(72, now() - Duration::days(3), 1);
        let first = evaluate(&record, now(), &DecayParams::default(), None);
        let second = evaluate(&record, now(), &DecayParams::default(), None);
        assert_eq!(first, second);
        assert_eq!(record.health, 72);
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(status_for_health(100), WordStatus::Healthy);
        assert_eq!(status_for_health(80), WordStatus::Healthy);
        assert_eq!(status_for_health(79), WordStatus::Forgotten);
        assert_eq!(status_for_health(50), WordStatus::Forgotten);
        assert_eq!(status_for_health(49), WordStatus::RescuePriority);
        assert_eq!(status_for_health(30), WordStatus::RescuePriority);
        assert_eq!(status_for_health(0), WordStatus::RescuePriority);
    }
}
