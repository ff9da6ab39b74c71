//! Talent profiles, collaboration proposals, and the moderation workflow over them.

pub mod avatar;
pub mod domain;
pub mod intake;
pub mod repository;
pub mod router;
pub mod routes;
pub mod search;
pub mod service;
pub mod storage;
pub mod upload;
pub mod verification;
pub mod views;

#[cfg(test)]
mod tests;

pub use avatar::{parse_avatar_preset, resolve_avatar, AVATAR_PRESET_MAX, AVATAR_PRESET_MIN};
pub use domain::{
    Collaboration, CollaborationId, NewCollaboration, NewProfile, Profile, ProfileId, StoredFile,
    VerificationStatus,
};
pub use intake::{CollaborationSubmission, FormErrors, IntakeGuard, ProfileSubmission};
pub use repository::{CollaborationRepository, ProfileRepository, RepositoryError};
pub use router::{talents_router, AdminGate, ADMIN_USER_HEADER};
pub use routes::{reverse, RouteName, ROUTES};
pub use search::{filter_newest_first, AdminProfileFilter, SearchQuery};
pub use service::{Clock, SystemClock, TalentDirectoryService, TalentServiceError};
pub use storage::{FileStore, StorageError, UploadKind};
pub use upload::UploadedFile;
pub use verification::{CommentPolicy, ProfileEdit, VerificationDecision};
