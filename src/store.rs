//! Persistence boundary.
//!
//! The engine never assumes a storage technology: hosts implement [`Store`]
//! over whatever they have. Saves are optimistic: the store compares the
//! aggregate's `version` with what it holds and rejects stale writers with
//! [`StoreError::Conflict`]. [`MemoryStore`] is the reference implementation
//! and the test double.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::types::{LearnerProfile, MemoryRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("corrupted state: {0}")]
    Corrupted(String),
    #[error("version conflict")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn load_profile(&self, learner_id: &str) -> Result<Option<LearnerProfile>, StoreError>;

    async fn load_record(
        &self,
        learner_id: &str,
        item_id: &str,
    ) -> Result<Option<MemoryRecord>, StoreError>;

    /// Persists the profile alone. Bumps `profile.version` on success.
    async fn save_profile(
        &self,
        learner_id: &str,
        profile: &mut LearnerProfile,
    ) -> Result<(), StoreError>;

    /// Persists a review outcome: profile and record commit together or not
    /// at all. Bumps both versions on success.
    async fn save_outcome(
        &self,
        learner_id: &str,
        profile: &mut LearnerProfile,
        record: &mut MemoryRecord,
    ) -> Result<(), StoreError>;
}

#[derive(Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<String, LearnerProfile>>,
    records: RwLock<HashMap<(String, String), MemoryRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test seeding: inserts as-is, no version check.
    pub fn seed_profile(&self, profile: LearnerProfile) {
        self.profiles
            .write()
            .insert(profile.learner_id.clone(), profile);
    }

    /// Test seeding: inserts as-is, no version check.
    pub fn seed_record(&self, learner_id: &str, record: MemoryRecord) {
        self.records
            .write()
            .insert((learner_id.to_string(), record.item_id.clone()), record);
    }

    fn check_version(stored: Option<i64>, incoming: i64) -> Result<(), StoreError> {
        match stored {
            Some(version) if version != incoming => Err(StoreError::Conflict),
            None if incoming != 0 => Err(StoreError::Conflict),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load_profile(&self, learner_id: &str) -> Result<Option<LearnerProfile>, StoreError> {
        Ok(self.profiles.read().get(learner_id).cloned())
    }

    async fn load_record(
        &self,
        learner_id: &str,
        item_id: &str,
    ) -> Result<Option<MemoryRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .get(&(learner_id.to_string(), item_id.to_string()))
            .cloned())
    }

    async fn save_profile(
        &self,
        learner_id: &str,
        profile: &mut LearnerProfile,
    ) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write();
        Self::check_version(
            profiles.get(learner_id).map(|p| p.version),
            profile.version,
        )?;
        profile.version += 1;
        profiles.insert(learner_id.to_string(), profile.clone());
        Ok(())
    }

    async fn save_outcome(
        &self,
        learner_id: &str,
        profile: &mut LearnerProfile,
        record: &mut MemoryRecord,
    ) -> Result<(), StoreError> {
        // Both guards held for the whole commit keeps it all-or-nothing.
        let mut profiles = self.profiles.write();
        let mut records = self.records.write();

        let record_key = (learner_id.to_string(), record.item_id.clone());
        Self::check_version(
            profiles.get(learner_id).map(|p| p.version),
            profile.version,
        )?;
        Self::check_version(records.get(&record_key).map(|r| r.version), record.version)?;

        profile.version += 1;
        record.version += 1;
        profiles.insert(learner_id.to_string(), profile.clone());
        records.insert(record_key, record.clone());
        Ok(())
    }
}
