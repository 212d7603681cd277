//! Converts a single review outcome into experience, currency and health
//! restoration.
//!
//! Event multipliers scale experience only; coins and health restoration stay
//! flat even while an event is live. The asymmetry is deliberate.

use crate::config::RewardParams;
use crate::error::EngineError;
use crate::evaluator::{status_for_health, HEALTHY_THRESHOLD};
use crate::types::{EventRules, ReviewOutcome, RewardResult, WordStatus};

/// Rejects malformed outcomes before any state is touched.
pub fn validate(outcome: &ReviewOutcome, params: &RewardParams) -> Result<(), EngineError> {
    if outcome.elapsed_secs < 0 {
        return Err(EngineError::InvalidOutcome(
            "elapsedSecs must be non-negative".to_string(),
        ));
    }
    if outcome.elapsed_secs > params.max_elapsed_secs {
        return Err(EngineError::InvalidOutcome(format!(
            "elapsedSecs exceeds maximum of {}",
            params.max_elapsed_secs
        )));
    }
    for power_up in &outcome.power_ups {
        if !power_up.xp_multiplier.is_finite() || power_up.xp_multiplier < 0.0 {
            return Err(EngineError::InvalidOutcome(format!(
                "power-up {} has an invalid multiplier",
                power_up.name
            )));
        }
    }
    Ok(())
}

pub fn calculate(
    outcome: &ReviewOutcome,
    params: &RewardParams,
    rules: Option<&EventRules>,
) -> RewardResult {
    if !outcome.success {
        return RewardResult::default();
    }

    let mut xp = params.word_rescued_xp;
    let mut coins = params.word_rescued_coins;

    if outcome.perfect {
        xp += params.perfect_game_xp;
        coins += params.perfect_game_coins;
    }
    if outcome.elapsed_secs < params.speed_bonus_window_secs {
        xp += params.speed_bonus_xp;
    }

    let health_restore = if outcome.perfect {
        params.perfect_game_restore
    } else {
        params.successful_rescue_restore
    };

    let mut multiplier = rules.map(|r| r.xp_multiplier).unwrap_or(1.0);
    for power_up in &outcome.power_ups {
        multiplier *= power_up.xp_multiplier;
    }

    RewardResult {
        xp: (xp as f64 * multiplier).round() as i64,
        coins,
        health_restore,
    }
}

/// Status after a successful review. Mastered requires restored health at the
/// healthy threshold and full mastery; otherwise a word pulled out of
/// `Forgotten`/`RescuePriority` is `Rescued` for one evaluation cycle, and a
/// word that was already fine re-derives from its health.
pub fn success_status(
    prior: WordStatus,
    health: i64,
    mastery_level: i64,
    params: &RewardParams,
) -> WordStatus {
    if health >= HEALTHY_THRESHOLD && mastery_level >= params.mastery_threshold {
        return WordStatus::Mastered;
    }
    match prior {
        WordStatus::Forgotten | WordStatus::RescuePriority => WordStatus::Rescued,
        _ => status_for_health(health),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PowerUp;

    #[test]
    fn test_perfect_fast_rescue() {
        let outcome = ReviewOutcome::perfect(20);
        let reward = calculate(&outcome, &RewardParams::default(), None);
        assert_eq!(reward.xp, 90);
        assert_eq!(reward.coins, 15);
        assert_eq!(reward.health_restore, 50);
    }

    #[test]
    fn test_plain_success() {
        let outcome = ReviewOutcome::success(45);
        let reward = calculate(&outcome, &RewardParams::default(), None);
        assert_eq!(reward.xp, 50);
        assert_eq!(reward.coins, 10);
        assert_eq!(reward.health_restore, 30);
    }

    #[test]
    fn test_failure_earns_nothing() {
        let outcome = ReviewOutcome::failure(12);
        let reward = calculate(&outcome, &RewardParams::default(), None);
        assert_eq!(reward, RewardResult::default());
    }

    #[test]
    fn test_event_scales_xp_only() {
        let rules = EventRules {
            decay_multiplier: 1.0,
            xp_multiplier: 2.0,
        };
        let outcome = ReviewOutcome::perfect(20);
        let reward = calculate(&outcome, &RewardParams::default(), Some(&rules));
        assert_eq!(reward.xp, 180);
        assert_eq!(reward.coins, 15);
        assert_eq!(reward.health_restore, 50);
    }

    #[test]
    fn test_power_ups_stack_on_xp() {
        let mut outcome = ReviewOutcome::success(45);
        outcome.power_ups.push(PowerUp {
            name: "double_xp".to_string(),
            xp_multiplier: 2.0,
        });
        let reward = calculate(&outcome, &RewardParams::default(), None);
        assert_eq!(reward.xp, 100);
        assert_eq!(reward.coins, 10);
    }

    #[test]
    fn test_rejects_negative_elapsed() {
        let outcome = ReviewOutcome::success(-1);
        assert!(matches!(
            validate(&outcome, &RewardParams::default()),
            Err(EngineError::InvalidOutcome(_))
        ));
    }

    #[test]
    fn test_rejects_bad_power_up_multiplier() {
        let mut outcome = ReviewOutcome::success(10);
        outcome.power_ups.push(PowerUp {
            name: "broken".to_string(),
            xp_multiplier: f64::NAN,
        });
        assert!(matches!(
            validate(&outcome, &RewardParams::default()),
            Err(EngineError::InvalidOutcome(_))
        ));
    }

    #[test]
    fn test_mastered_requires_full_mastery() {
        let params = RewardParams::default();
        assert_eq!(
            success_status(WordStatus::RescuePriority, 90, 100, &params),
            WordStatus::Mastered
        );
        assert_eq!(
            success_status(WordStatus::RescuePriority, 90, 90, &params),
            WordStatus::Rescued
        );
        assert_eq!(
            success_status(WordStatus::Forgotten, 75, 100, &params),
            WordStatus::Rescued
        );
    }

    #[test]
    fn test_healthy_word_stays_healthy() {
        let params = RewardParams::default();
        assert_eq!(
            success_status(WordStatus::Healthy, 100, 50, &params),
            WordStatus::Healthy
        );
    }
}
