use serde::{Deserialize, Serialize};

use crate::types::{BadgeCriterion, BadgeKind, MissionKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayParams {
    /// Health points lost per full day since the last review.
    pub daily_decay: i64,
    /// Health points lost per recorded mistake.
    pub mistake_decay: i64,
}

impl Default for DecayParams {
    fn default() -> Self {
        Self {
            daily_decay: 5,
            mistake_decay: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardParams {
    pub word_rescued_xp: i64,
    pub word_rescued_coins: i64,
    pub perfect_game_xp: i64,
    pub perfect_game_coins: i64,
    pub speed_bonus_xp: i64,
    pub speed_bonus_window_secs: i64,
    pub successful_rescue_restore: i64,
    pub perfect_game_restore: i64,
    /// Mastery points gained per successful review, capped at 100.
    pub mastery_gain: i64,
    /// Mastery level required (together with healthy health) to mark a word
    /// as mastered.
    pub mastery_threshold: i64,
    /// Upper bound on a plausible round duration. Longer values are rejected
    /// as invalid input.
    pub max_elapsed_secs: i64,
}

impl Default for RewardParams {
    fn default() -> Self {
        Self {
            word_rescued_xp: 50,
            word_rescued_coins: 10,
            perfect_game_xp: 25,
            perfect_game_coins: 5,
            speed_bonus_xp: 15,
            speed_bonus_window_secs: 30,
            successful_rescue_restore: 30,
            perfect_game_restore: 50,
            mastery_gain: 10,
            mastery_threshold: 100,
            max_elapsed_secs: 24 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionParams {
    /// Cumulative experience required to reach level `index + 1`.
    pub level_thresholds: Vec<i64>,
    /// Beyond the table, each level's requirement grows by an additional
    /// `extra_requirement_step` over the previous increase.
    pub extra_requirement_step: i64,
    pub level_up_coins: i64,
}

impl Default for ProgressionParams {
    fn default() -> Self {
        Self {
            level_thresholds: vec![0, 100, 250, 500, 1000],
            extra_requirement_step: 500,
            level_up_coins: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionTemplate {
    pub kind: MissionKind,
    pub target: i64,
    pub reward_experience: i64,
    pub reward_currency: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionParams {
    pub templates: Vec<MissionTemplate>,
}

impl Default for MissionParams {
    fn default() -> Self {
        Self {
            templates: vec![
                MissionTemplate {
                    kind: MissionKind::ReviewWords,
                    target: 10,
                    reward_experience: 30,
                    reward_currency: 10,
                },
                MissionTemplate {
                    kind: MissionKind::RescueWords,
                    target: 3,
                    reward_experience: 50,
                    reward_currency: 15,
                },
                MissionTemplate {
                    kind: MissionKind::PerfectGames,
                    target: 1,
                    reward_experience: 40,
                    reward_currency: 10,
                },
                // Coin-only reward: an experience mission must not feed its
                // own progress.
                MissionTemplate {
                    kind: MissionKind::EarnExperience,
                    target: 200,
                    reward_experience: 0,
                    reward_currency: 25,
                },
            ],
        }
    }
}

pub fn default_badges() -> Vec<BadgeCriterion> {
    vec![
        BadgeCriterion {
            id: "first_rescue".to_string(),
            kind: BadgeKind::WordsRescued,
            threshold: 1,
        },
        BadgeCriterion {
            id: "word_guardian".to_string(),
            kind: BadgeKind::WordsRescued,
            threshold: 25,
        },
        BadgeCriterion {
            id: "word_champion".to_string(),
            kind: BadgeKind::WordsRescued,
            threshold: 100,
        },
        BadgeCriterion {
            id: "streak_3".to_string(),
            kind: BadgeKind::StreakDays,
            threshold: 3,
        },
        BadgeCriterion {
            id: "streak_7".to_string(),
            kind: BadgeKind::StreakDays,
            threshold: 7,
        },
        BadgeCriterion {
            id: "streak_30".to_string(),
            kind: BadgeKind::StreakDays,
            threshold: 30,
        },
        BadgeCriterion {
            id: "perfectionist".to_string(),
            kind: BadgeKind::PerfectGames,
            threshold: 10,
        },
        BadgeCriterion {
            id: "lightning_rescue".to_string(),
            kind: BadgeKind::SpeedRecord,
            threshold: 10,
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub decay: DecayParams,
    pub rewards: RewardParams,
    pub progression: ProgressionParams,
    pub missions: MissionParams,
    pub badges: Vec<BadgeCriterion>,
    /// Upper bound for a single persistence call, in milliseconds.
    pub io_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decay: DecayParams::default(),
            rewards: RewardParams::default(),
            progression: ProgressionParams::default(),
            missions: MissionParams::default(),
            badges: default_badges(),
            io_timeout_ms: 5_000,
        }
    }
}
