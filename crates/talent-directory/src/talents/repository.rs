use chrono::{DateTime, Utc};

use super::domain::{Collaboration, CollaborationId, Profile, ProfileId, VerificationStatus};

/// Storage abstraction for profiles so the service can be exercised in isolation.
pub trait ProfileRepository: Send + Sync {
    fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError>;
    fn update(&self, profile: Profile) -> Result<(), RepositoryError>;
    fn fetch(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError>;
    fn all(&self) -> Result<Vec<Profile>, RepositoryError>;
    /// Batched status update over a selection; returns how many records changed.
    /// Unknown identifiers are skipped.
    fn set_status_many(
        &self,
        ids: &[ProfileId],
        status: VerificationStatus,
        verified_at: DateTime<Utc>,
    ) -> Result<usize, RepositoryError>;
}

/// Storage abstraction for collaboration proposals.
pub trait CollaborationRepository: Send + Sync {
    fn insert(&self, collaboration: Collaboration) -> Result<Collaboration, RepositoryError>;
    fn fetch(&self, id: CollaborationId) -> Result<Option<Collaboration>, RepositoryError>;
    fn all(&self) -> Result<Vec<Collaboration>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
