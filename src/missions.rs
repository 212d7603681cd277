//! Daily mission state machine.
//!
//! One mission set per calendar day (UTC). Progress only moves forward within
//! the day; `completed` latches; the reward is paid once, on an explicit
//! claim.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::MissionParams;
use crate::error::EngineError;
use crate::types::{DailyMissions, LearnerProfile, Mission, MissionKind};

/// Replaces the mission set when the profile's missions are from an earlier
/// day (or were never initialized). Returns true when a fresh set was rolled.
pub fn roll_daily(
    profile: &mut LearnerProfile,
    now: DateTime<Utc>,
    params: &MissionParams,
) -> bool {
    let today = now.date_naive();
    if profile.daily_missions.date == today && !profile.daily_missions.missions.is_empty() {
        return false;
    }

    profile.daily_missions = DailyMissions {
        date: today,
        missions: params
            .templates
            .iter()
            .map(|template| Mission {
                id: Uuid::new_v4().to_string(),
                kind: template.kind,
                target: template.target.max(1),
                current_progress: 0,
                completed: false,
                reward_experience: template.reward_experience,
                reward_currency: template.reward_currency,
                reward_claimed: false,
            })
            .collect(),
    };
    true
}

/// Advances every open mission of `kind` by `amount`, capped at the target.
/// Returns the ids of missions completed by this update.
pub fn record_progress(
    profile: &mut LearnerProfile,
    kind: MissionKind,
    amount: i64,
) -> Vec<String> {
    let mut completed = Vec::new();
    if amount <= 0 {
        return completed;
    }

    for mission in &mut profile.daily_missions.missions {
        if mission.kind != kind || mission.completed {
            continue;
        }
        mission.current_progress = mission
            .current_progress
            .saturating_add(amount)
            .min(mission.target);
        if mission.current_progress >= mission.target {
            mission.completed = true;
            completed.push(mission.id.clone());
        }
    }
    completed
}

/// Marks a completed mission claimed and hands back its (xp, coins) reward.
/// Claiming an unknown, incomplete or already-claimed mission fails without
/// touching the profile.
pub fn claim(profile: &mut LearnerProfile, mission_id: &str) -> Result<(i64, i64), EngineError> {
    let mission = profile
        .daily_missions
        .missions
        .iter_mut()
        .find(|m| m.id == mission_id)
        .ok_or_else(|| EngineError::NotFound(format!("mission {mission_id}")))?;

    if !mission.completed {
        return Err(EngineError::MissionNotClaimable(
            "mission is not completed".to_string(),
        ));
    }
    if mission.reward_claimed {
        return Err(EngineError::MissionNotClaimable(
            "reward already claimed".to_string(),
        ));
    }

    mission.reward_claimed = true;
    Ok((mission.reward_experience, mission.reward_currency))
}
