//! Badge criteria evaluation.
//!
//! A badge is earned the moment the learner's cumulative statistic first
//! reaches its threshold, and is never revoked. Evaluation is idempotent:
//! re-checking with unchanged stats yields nothing new.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::types::{BadgeCriterion, BadgeGrant, BadgeKind, LearnerProfile};

fn eligible(criterion: &BadgeCriterion, profile: &LearnerProfile) -> bool {
    match criterion.kind {
        BadgeKind::WordsRescued => profile.rescued_count >= criterion.threshold,
        BadgeKind::StreakDays => profile.streak_days >= criterion.threshold,
        BadgeKind::PerfectGames => profile.perfect_games >= criterion.threshold,
        // Speed is a record, not a counter: earned once the best solve is at
        // or under the threshold.
        BadgeKind::SpeedRecord => profile
            .fastest_solve_secs
            .map(|secs| secs <= criterion.threshold)
            .unwrap_or(false),
    }
}

/// Newly earned badges only; already-held badges are skipped.
pub fn check_badges(
    profile: &LearnerProfile,
    catalog: &[BadgeCriterion],
    now: DateTime<Utc>,
) -> Vec<BadgeGrant> {
    let held: HashSet<&str> = profile.badges.iter().map(|b| b.badge_id.as_str()).collect();

    catalog
        .iter()
        .filter(|criterion| !held.contains(criterion.id.as_str()) && eligible(criterion, profile))
        .map(|criterion| BadgeGrant {
            badge_id: criterion.id.clone(),
            earned_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_badges;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_threshold_crossing_awards() {
        let mut profile = LearnerProfile::new("user_1");
        profile.rescued_count = 1;
        let grants = check_badges(&profile, &default_badges(), now());
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].badge_id, "first_rescue");
    }

    #[test]
    fn test_idempotent_once_held() {
        let mut profile = LearnerProfile::new("user_1");
        profile.rescued_count = 1;
        let grants = check_badges(&profile, &default_badges(), now());
        profile.badges.extend(grants);

        let again = check_badges(&profile, &default_badges(), now());
        assert!(again.is_empty());
    }

    #[test]
    fn test_multiple_tiers_at_once() {
        let mut profile = LearnerProfile::new("user_1");
        profile.rescued_count = 30;
        let grants = check_badges(&profile, &default_badges(), now());
        let ids: Vec<&str> = grants.iter().map(|g| g.badge_id.as_str()).collect();
        assert!(ids.contains(&"first_rescue"));
        assert!(ids.contains(&"word_guardian"));
        assert!(!ids.contains(&"word_champion"));
    }

    #[test]
    fn test_speed_record_compares_downward() {
        let mut profile = LearnerProfile::new("user_1");
        profile.fastest_solve_secs = Some(12);
        assert!(check_badges(&profile, &default_badges(), now()).is_empty());

        profile.fastest_solve_secs = Some(9);
        let grants = check_badges(&profile, &default_badges(), now());
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].badge_id, "lightning_rescue");
    }

    #[test]
    fn test_streak_badges() {
        let mut profile = LearnerProfile::new("user_1");
        profile.streak_days = 7;
        let grants = check_badges(&profile, &default_badges(), now());
        let ids: Vec<&str> = grants.iter().map(|g| g.badge_id.as_str()).collect();
        assert_eq!(ids, vec!["streak_3", "streak_7"]);
    }
}
