//! Engine orchestration.
//!
//! Pure calculators live in their own modules; this layer wires them to the
//! injected clock, event calendar and store. Writes for one learner are
//! serialized through a per-learner async lock so concurrent submissions can
//! never read stale health and double-apply a reward. Reads go straight to
//! the latest committed snapshot.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{self, EventCalendar};
use crate::store::{Store, StoreError};
use crate::types::{
    BadgeGrant, EventRules, LearnerProfile, MemoryRecord, Mission, MissionKind, ReviewOutcome,
    RewardResult, StatusSnapshot, WordStatus,
};
use crate::{badges, evaluator, missions, progression, rewards, scheduler};

/// Everything a caller needs to render the result of one review submission.
#[derive(Debug, Clone)]
pub struct OutcomeReport {
    pub profile: LearnerProfile,
    pub record: MemoryRecord,
    pub reward: RewardResult,
    pub leveled_up: bool,
    pub completed_missions: Vec<String>,
    pub new_badges: Vec<BadgeGrant>,
}

pub struct RescueEngine {
    config: EngineConfig,
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    calendar: Arc<dyn EventCalendar>,
    learner_locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl RescueEngine {
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        calendar: Arc<dyn EventCalendar>,
    ) -> Self {
        Self {
            config,
            store,
            clock,
            calendar,
            learner_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn learner_lock(&self, learner_id: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.learner_locks.lock();
        Arc::clone(
            locks
                .entry(learner_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        )
    }

    async fn store_call<T>(
        &self,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, EngineError> {
        let timeout = Duration::from_millis(self.config.io_timeout_ms);
        match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result.map_err(EngineError::from),
            Err(_) => Err(EngineError::StoreTimeout),
        }
    }

    fn active_rules(&self, now: DateTime<Utc>) -> Option<EventRules> {
        events::active_event(&self.calendar.list(), now).map(|event| event.rules)
    }

    /// Current health and status of a stored record, decayed to `now`.
    /// Read path: no lock, no mutation.
    pub async fn evaluate_status(
        &self,
        learner_id: &str,
        item_id: &str,
    ) -> Result<StatusSnapshot, EngineError> {
        let now = self.clock.now();
        let record = self
            .store_call(self.store.load_record(learner_id, item_id))
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("record for item {item_id}")))?;
        Ok(evaluator::evaluate(
            &record,
            now,
            &self.config.decay,
            self.active_rules(now).as_ref(),
        ))
    }

    /// When the item should resurface if it were reviewed right now.
    pub async fn schedule_next_review(
        &self,
        learner_id: &str,
        item_id: &str,
    ) -> Result<DateTime<Utc>, EngineError> {
        let now = self.clock.now();
        let record = self
            .store_call(self.store.load_record(learner_id, item_id))
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("record for item {item_id}")))?;
        Ok(scheduler::next_review(
            record.mastery_level,
            record.forget_count,
            now,
        ))
    }

    /// Applies one review outcome: decay, reward, status transition,
    /// scheduling, ledger, missions and badges, committed atomically.
    pub async fn apply_outcome(
        &self,
        learner_id: &str,
        item_id: &str,
        outcome: &ReviewOutcome,
    ) -> Result<OutcomeReport, EngineError> {
        rewards::validate(outcome, &self.config.rewards)?;

        let lock = self.learner_lock(learner_id);
        let _guard = lock.lock().await;

        let now = self.clock.now();
        let rules = self.active_rules(now);

        let mut profile = self
            .store_call(self.store.load_profile(learner_id))
            .await?
            .unwrap_or_else(|| LearnerProfile::new(learner_id));
        let mut record = self
            .store_call(self.store.load_record(learner_id, item_id))
            .await?
            .unwrap_or_else(|| MemoryRecord::new(item_id, now));

        let snapshot = evaluator::evaluate(&record, now, &self.config.decay, rules.as_ref());
        let pre_status = snapshot.status;
        record.health = snapshot.health;
        record.status = snapshot.status;

        if pre_status == WordStatus::RescuePriority {
            record.rescue_attempts += 1;
        }

        let reward = rewards::calculate(outcome, &self.config.rewards, rules.as_ref());
        let mut rescued = false;
        let mut leveled_up = false;
        let mut completed_missions = Vec::new();

        if outcome.success {
            record.health = (record.health + reward.health_restore).min(evaluator::HEALTH_MAX);
            record.mastery_level =
                (record.mastery_level + self.config.rewards.mastery_gain).min(100);

            let next_status = rewards::success_status(
                pre_status,
                record.health,
                record.mastery_level,
                &self.config.rewards,
            );
            rescued = matches!(
                pre_status,
                WordStatus::Forgotten | WordStatus::RescuePriority
            ) && next_status.is_success_only();
            record.status = next_status;

            if rescued {
                profile.rescued_count += 1;
            }
            if outcome.perfect {
                profile.perfect_games += 1;
            }
            if profile
                .fastest_solve_secs
                .map_or(true, |best| outcome.elapsed_secs < best)
            {
                profile.fastest_solve_secs = Some(outcome.elapsed_secs);
            }
        } else {
            record.forget_count += 1;
        }

        record.last_seen = now;
        record.next_review_at = scheduler::next_review(record.mastery_level, record.forget_count, now);

        profile.touch_active(now.date_naive());
        missions::roll_daily(&mut profile, now, &self.config.missions);
        completed_missions.extend(missions::record_progress(
            &mut profile,
            MissionKind::ReviewWords,
            1,
        ));
        if rescued {
            completed_missions.extend(missions::record_progress(
                &mut profile,
                MissionKind::RescueWords,
                1,
            ));
        }
        if outcome.success && outcome.perfect {
            completed_missions.extend(missions::record_progress(
                &mut profile,
                MissionKind::PerfectGames,
                1,
            ));
        }
        if outcome.success {
            let (_, up) = progression::add_experience(&mut profile, reward.xp, &self.config.progression);
            leveled_up = up;
            profile.currency = profile.currency.saturating_add(reward.coins);
            completed_missions.extend(missions::record_progress(
                &mut profile,
                MissionKind::EarnExperience,
                reward.xp,
            ));
        }

        let new_badges = badges::check_badges(&profile, &self.config.badges, now);
        profile.badges.extend(new_badges.iter().cloned());

        self.store_call(self.store.save_outcome(learner_id, &mut profile, &mut record))
            .await?;

        tracing::info!(
            learner = learner_id,
            item = item_id,
            success = outcome.success,
            status = record.status.as_str(),
            xp = reward.xp,
            "review outcome applied"
        );

        Ok(OutcomeReport {
            profile,
            record,
            reward,
            leveled_up,
            completed_missions,
            new_badges,
        })
    }

    /// Today's mission list, rolling a fresh set at the day boundary.
    pub async fn daily_mission_snapshot(
        &self,
        learner_id: &str,
    ) -> Result<Vec<Mission>, EngineError> {
        let lock = self.learner_lock(learner_id);
        let _guard = lock.lock().await;

        let now = self.clock.now();
        let mut profile = self
            .store_call(self.store.load_profile(learner_id))
            .await?
            .unwrap_or_else(|| LearnerProfile::new(learner_id));

        if missions::roll_daily(&mut profile, now, &self.config.missions) {
            self.store_call(self.store.save_profile(learner_id, &mut profile))
                .await?;
            tracing::debug!(learner = learner_id, "daily missions rolled");
        }
        Ok(profile.daily_missions.missions)
    }

    /// Pays out a completed mission exactly once.
    pub async fn claim_mission(
        &self,
        learner_id: &str,
        mission_id: &str,
    ) -> Result<RewardResult, EngineError> {
        let lock = self.learner_lock(learner_id);
        let _guard = lock.lock().await;

        let mut profile = self
            .store_call(self.store.load_profile(learner_id))
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("profile for {learner_id}")))?;

        let (xp, coins) = missions::claim(&mut profile, mission_id)?;
        progression::add_experience(&mut profile, xp, &self.config.progression);
        profile.currency = profile.currency.saturating_add(coins);

        self.store_call(self.store.save_profile(learner_id, &mut profile))
            .await?;

        Ok(RewardResult {
            xp,
            coins,
            health_restore: 0,
        })
    }

    /// Evaluates badge criteria against the current stats; returns and
    /// persists newly earned badges only.
    pub async fn check_badges(&self, learner_id: &str) -> Result<Vec<BadgeGrant>, EngineError> {
        let lock = self.learner_lock(learner_id);
        let _guard = lock.lock().await;

        let now = self.clock.now();
        let Some(mut profile) = self
            .store_call(self.store.load_profile(learner_id))
            .await?
        else {
            return Ok(Vec::new());
        };

        let new_badges = badges::check_badges(&profile, &self.config.badges, now);
        if !new_badges.is_empty() {
            profile.badges.extend(new_badges.iter().cloned());
            self.store_call(self.store.save_profile(learner_id, &mut profile))
                .await?;
            tracing::info!(
                learner = learner_id,
                count = new_badges.len(),
                "badges awarded"
            );
        }
        Ok(new_badges)
    }
}
