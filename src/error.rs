use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid outcome: {0}")]
    InvalidOutcome(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("state corruption: {0}")]
    StateCorruption(String),
    #[error("concurrent modification")]
    ConcurrentModification,
    #[error("mission not claimable: {0}")]
    MissionNotClaimable(String),
    #[error("store operation timed out")]
    StoreTimeout,
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound("aggregate not found".to_string()),
            StoreError::Corrupted(msg) => Self::StateCorruption(msg),
            StoreError::Conflict => Self::ConcurrentModification,
            other => Self::Store(other),
        }
    }
}
