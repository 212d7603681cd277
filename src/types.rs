#![allow(dead_code)]

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[derive(Default)]
pub enum WordStatus {
    #[default]
    Healthy,
    Forgotten,
    RescuePriority,
    Rescued,
    Mastered,
}

impl WordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "HEALTHY",
            Self::Forgotten => "FORGOTTEN",
            Self::RescuePriority => "RESCUE_PRIORITY",
            Self::Rescued => "RESCUED",
            Self::Mastered => "MASTERED",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "FORGOTTEN" => Self::Forgotten,
            "RESCUE_PRIORITY" => Self::RescuePriority,
            "RESCUED" => Self::Rescued,
            "MASTERED" => Self::Mastered,
            _ => Self::Healthy,
        }
    }

    /// Statuses a word can only reach through a successful review, never
    /// through decay.
    pub fn is_success_only(&self) -> bool {
        matches!(self, Self::Rescued | Self::Mastered)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    pub item_id: String,
    pub status: WordStatus,
    pub health: i64,
    pub last_seen: DateTime<Utc>,
    pub forget_count: i64,
    pub next_review_at: DateTime<Utc>,
    pub mastery_level: i64,
    pub rescue_attempts: i64,
    /// Zone and difficulty tier as placed by the map UI. Opaque to the
    /// engine: stored verbatim, never computed from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_position: Option<serde_json::Value>,
    pub version: i64,
}

impl MemoryRecord {
    pub fn new(item_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            item_id: item_id.to_string(),
            status: WordStatus::Healthy,
            health: 100,
            last_seen: now,
            forget_count: 0,
            next_review_at: now + chrono::Duration::days(1),
            mastery_level: 0,
            rescue_attempts: 0,
            map_position: None,
            version: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeGrant {
    pub badge_id: String,
    pub earned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    WordsRescued,
    StreakDays,
    PerfectGames,
    SpeedRecord,
}

impl BadgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WordsRescued => "words_rescued",
            Self::StreakDays => "streak_days",
            Self::PerfectGames => "perfect_games",
            Self::SpeedRecord => "speed_record",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "streak_days" => Self::StreakDays,
            "perfect_games" => Self::PerfectGames,
            "speed_record" => Self::SpeedRecord,
            _ => Self::WordsRescued,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeCriterion {
    pub id: String,
    pub kind: BadgeKind,
    pub threshold: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    ReviewWords,
    RescueWords,
    PerfectGames,
    EarnExperience,
}

impl MissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReviewWords => "review_words",
            Self::RescueWords => "rescue_words",
            Self::PerfectGames => "perfect_games",
            Self::EarnExperience => "earn_experience",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "rescue_words" => Self::RescueWords,
            "perfect_games" => Self::PerfectGames,
            "earn_experience" => Self::EarnExperience,
            _ => Self::ReviewWords,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: String,
    pub kind: MissionKind,
    pub target: i64,
    pub current_progress: i64,
    pub completed: bool,
    pub reward_experience: i64,
    pub reward_currency: i64,
    pub reward_claimed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMissions {
    pub date: NaiveDate,
    pub missions: Vec<Mission>,
}

impl Default for DailyMissions {
    fn default() -> Self {
        // MIN is never a real play day, so the first snapshot always rolls.
        Self {
            date: NaiveDate::MIN,
            missions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    pub learner_id: String,
    pub level: i64,
    pub experience: i64,
    pub currency: i64,
    pub rescued_count: i64,
    pub perfect_games: i64,
    pub streak_days: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fastest_solve_secs: Option<i64>,
    pub badges: Vec<BadgeGrant>,
    pub daily_missions: DailyMissions,
    pub version: i64,
}

impl LearnerProfile {
    pub fn new(learner_id: &str) -> Self {
        Self {
            learner_id: learner_id.to_string(),
            level: 1,
            experience: 0,
            currency: 0,
            rescued_count: 0,
            perfect_games: 0,
            streak_days: 0,
            last_active_date: None,
            fastest_solve_secs: None,
            badges: Vec::new(),
            daily_missions: DailyMissions::default(),
            version: 0,
        }
    }

    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.badges.iter().any(|b| b.badge_id == badge_id)
    }

    /// Updates the activity streak for a review happening on `today`.
    /// Consecutive calendar days extend the streak, a gap resets it to 1,
    /// repeat activity on the same day is a no-op.
    pub fn touch_active(&mut self, today: NaiveDate) {
        match self.last_active_date {
            Some(last) if last == today => return,
            Some(last) if last.checked_add_days(Days::new(1)) == Some(today) => {
                self.streak_days += 1;
            }
            _ => self.streak_days = 1,
        }
        self.last_active_date = Some(today);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUp {
    pub name: String,
    pub xp_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub success: bool,
    pub perfect: bool,
    pub elapsed_secs: i64,
    #[serde(default)]
    pub power_ups: Vec<PowerUp>,
}

impl ReviewOutcome {
    pub fn success(elapsed_secs: i64) -> Self {
        Self {
            success: true,
            perfect: false,
            elapsed_secs,
            power_ups: Vec::new(),
        }
    }

    pub fn perfect(elapsed_secs: i64) -> Self {
        Self {
            success: true,
            perfect: true,
            elapsed_secs,
            power_ups: Vec::new(),
        }
    }

    pub fn failure(elapsed_secs: i64) -> Self {
        Self {
            success: false,
            perfect: false,
            elapsed_secs,
            power_ups: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RewardResult {
    pub xp: i64,
    pub coins: i64,
    pub health_restore: i64,
}

/// Result of a pure decay evaluation. Callers apply it to the record; the
/// evaluation itself never mutates anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub health: i64,
    pub status: WordStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRules {
    pub decay_multiplier: f64,
    pub xp_multiplier: f64,
}

impl Default for EventRules {
    fn default() -> Self {
        Self {
            decay_multiplier: 1.0,
            xp_multiplier: 1.0,
        }
    }
}

/// A time-bounded campaign with a half-open `[starts_at, ends_at)` window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEvent {
    pub id: String,
    pub name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub rules: EventRules,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_round_trip() {
        for status in [
            WordStatus::Healthy,
            WordStatus::Forgotten,
            WordStatus::RescuePriority,
            WordStatus::Rescued,
            WordStatus::Mastered,
        ] {
            assert_eq!(WordStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn test_new_record_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let record = MemoryRecord::new("word_1", now);
        assert_eq!(record.health, 100);
        assert_eq!(record.status, WordStatus::Healthy);
        assert_eq!(record.mastery_level, 0);
        assert!(record.next_review_at > now);
    }

    #[test]
    fn test_streak_extends_on_consecutive_days() {
        let mut profile = LearnerProfile::new("user_1");
        let day1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        profile.touch_active(day1);
        assert_eq!(profile.streak_days, 1);
        profile.touch_active(day1);
        assert_eq!(profile.streak_days, 1);
        profile.touch_active(day2);
        assert_eq!(profile.streak_days, 2);
    }

    #[test]
    fn test_streak_resets_after_gap() {
        let mut profile = LearnerProfile::new("user_1");
        profile.touch_active(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        profile.touch_active(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        profile.touch_active(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(profile.streak_days, 1);
    }

    #[test]
    fn test_profile_json_round_trip() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut profile = LearnerProfile::new("user_1");
        profile.experience = 120;
        profile.level = 2;
        profile.badges.push(BadgeGrant {
            badge_id: "first_rescue".to_string(),
            earned_at: now,
        });

        let json = serde_json::to_string(&profile).unwrap();
        let back: LearnerProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut record = MemoryRecord::new("word_1", now);
        record.map_position = Some(serde_json::json!({"zone": "forest", "tier": 3}));

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("itemId").is_some());
        assert!(value.get("nextReviewAt").is_some());
        assert!(value.get("mapPosition").is_some());
        assert_eq!(value.get("status").unwrap(), "HEALTHY");
    }
}
