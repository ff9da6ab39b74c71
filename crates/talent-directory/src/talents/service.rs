use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::avatar::resolve_avatar;
use super::domain::{
    Collaboration, CollaborationId, Profile, ProfileId, StoredFile, VerificationStatus,
};
use super::intake::{CollaborationSubmission, FormErrors, IntakeGuard, ProfileSubmission};
use super::repository::{CollaborationRepository, ProfileRepository, RepositoryError};
use super::search::{filter_newest_first, AdminProfileFilter, Page, SearchQuery};
use super::storage::{FileStore, StorageError, UploadKind};
use super::verification::{
    annotate, apply_decision, apply_edit, CommentPolicy, ProfileEdit, VerificationDecision,
};

/// Rows per page on the moderation listings.
pub const ADMIN_PAGE_SIZE: usize = 20;

/// Source of the current time, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Service composing intake validation, repositories, file storage, and moderation.
pub struct TalentDirectoryService<P, C, F> {
    guard: IntakeGuard,
    proof_max_bytes: usize,
    profiles: Arc<P>,
    collaborations: Arc<C>,
    files: Arc<F>,
    clock: Arc<dyn Clock>,
    profile_sequence: AtomicU64,
    collaboration_sequence: AtomicU64,
}

impl<P, C, F> TalentDirectoryService<P, C, F>
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    pub fn new(
        profiles: Arc<P>,
        collaborations: Arc<C>,
        files: Arc<F>,
        proof_max_bytes: usize,
    ) -> Self {
        Self::with_clock(
            profiles,
            collaborations,
            files,
            proof_max_bytes,
            Arc::new(SystemClock),
        )
    }

    pub fn with_clock(
        profiles: Arc<P>,
        collaborations: Arc<C>,
        files: Arc<F>,
        proof_max_bytes: usize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            guard: IntakeGuard::new(proof_max_bytes),
            proof_max_bytes,
            profiles,
            collaborations,
            files,
            clock,
            profile_sequence: AtomicU64::new(1),
            collaboration_sequence: AtomicU64::new(1),
        }
    }

    pub fn proof_max_bytes(&self) -> usize {
        self.proof_max_bytes
    }

    pub fn file_url(&self, stored: &StoredFile) -> String {
        self.files.url(stored)
    }

    pub fn avatar_url(&self, profile: &Profile) -> String {
        resolve_avatar(profile, self.files.as_ref())
    }

    /// All profiles matching `query`, newest first.
    pub fn list_profiles(&self, query: &SearchQuery) -> Result<Vec<Profile>, TalentServiceError> {
        let profiles = filter_newest_first(self.profiles.all()?, query);
        debug!(count = profiles.len(), filtered = !query.is_empty(), "listed profiles");
        Ok(profiles)
    }

    /// Validate and persist a public profile submission. The stored status is always pending.
    pub fn submit_profile(
        &self,
        submission: ProfileSubmission,
    ) -> Result<Profile, TalentServiceError> {
        if let Some(requested) = submission.verification_status.as_deref() {
            debug!(requested, "ignoring client supplied verification status");
        }

        let validated = self.guard.validate_profile(submission)?;

        let avatar = validated
            .avatar
            .as_ref()
            .map(|file| self.files.store(UploadKind::Avatar, file))
            .transpose()?;
        let proof_file = match validated
            .proof_file
            .as_ref()
            .map(|file| self.files.store(UploadKind::Proof, file))
            .transpose()
        {
            Ok(proof_file) => proof_file,
            Err(err) => {
                self.discard_uploads(avatar.iter());
                return Err(err.into());
            }
        };
        let written: Vec<StoredFile> = avatar.iter().chain(proof_file.iter()).cloned().collect();

        let new = validated.profile;
        let profile = Profile {
            id: ProfileId(self.profile_sequence.fetch_add(1, Ordering::Relaxed)),
            name: new.name,
            skills: new.skills,
            passions: new.passions,
            languages: new.languages,
            projects: new.projects,
            avatar,
            avatar_preset: new.avatar_preset,
            proof_file,
            verification_status: VerificationStatus::Pending,
            admin_comment: String::new(),
            created_at: self.clock.now(),
            verified_at: None,
        };

        let stored = match self.profiles.insert(profile) {
            Ok(stored) => stored,
            Err(err) => {
                self.discard_uploads(written.iter());
                return Err(err.into());
            }
        };
        info!(
            profile_id = %stored.id,
            has_proof = stored.proof_file.is_some(),
            "profile submitted for verification"
        );
        Ok(stored)
    }

    /// Remove uploads written for a submission that was not persisted.
    fn discard_uploads<'a>(&self, files: impl Iterator<Item = &'a StoredFile>) {
        for stored in files {
            if let Err(err) = self.files.remove(stored) {
                warn!(path = %stored.path, error = %err, "failed to remove orphaned upload");
            }
        }
    }

    pub fn list_collaborations(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<Collaboration>, TalentServiceError> {
        Ok(filter_newest_first(self.collaborations.all()?, query))
    }

    pub fn submit_collaboration(
        &self,
        submission: CollaborationSubmission,
    ) -> Result<Collaboration, TalentServiceError> {
        let new = self.guard.validate_collaboration(submission)?;
        let collaboration = Collaboration {
            id: CollaborationId(self.collaboration_sequence.fetch_add(1, Ordering::Relaxed)),
            title: new.title,
            description: new.description,
            email: new.email,
            created_at: self.clock.now(),
        };

        let stored = self.collaborations.insert(collaboration)?;
        info!(collaboration_id = %stored.id, "collaboration proposal received");
        Ok(stored)
    }

    pub fn get_profile(&self, id: ProfileId) -> Result<Profile, TalentServiceError> {
        let profile = self.profiles.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(profile)
    }

    pub fn approve(&self, id: ProfileId, actor: &str) -> Result<Profile, TalentServiceError> {
        self.decide(id, VerificationDecision::Approve, actor)
    }

    pub fn reject(&self, id: ProfileId, actor: &str) -> Result<Profile, TalentServiceError> {
        self.decide(id, VerificationDecision::Reject, actor)
    }

    /// Single-record moderation action; an existing comment is kept.
    fn decide(
        &self,
        id: ProfileId,
        decision: VerificationDecision,
        actor: &str,
    ) -> Result<Profile, TalentServiceError> {
        let mut profile = match self.profiles.fetch(id)? {
            Some(profile) => profile,
            None => {
                warn!(profile_id = %id, actor, "moderation action on unknown profile");
                return Err(RepositoryError::NotFound.into());
            }
        };

        apply_decision(
            &mut profile,
            decision,
            actor,
            self.clock.now(),
            CommentPolicy::PreserveExisting,
        );
        self.profiles.update(profile.clone())?;

        info!(
            profile_id = %id,
            actor,
            status = profile.verification_status.label(),
            "profile verification updated"
        );
        Ok(profile)
    }

    pub fn bulk_approve(
        &self,
        ids: &[ProfileId],
        actor: &str,
    ) -> Result<usize, TalentServiceError> {
        self.bulk_decide(ids, VerificationDecision::Approve, actor)
    }

    pub fn bulk_reject(
        &self,
        ids: &[ProfileId],
        actor: &str,
    ) -> Result<usize, TalentServiceError> {
        self.bulk_decide(ids, VerificationDecision::Reject, actor)
    }

    /// Batched status update followed by a per-record pass that always replaces the comment.
    /// A selection naming the same profile twice counts it once.
    fn bulk_decide(
        &self,
        ids: &[ProfileId],
        decision: VerificationDecision,
        actor: &str,
    ) -> Result<usize, TalentServiceError> {
        let ids: Vec<ProfileId> = ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let now = self.clock.now();
        let updated = self
            .profiles
            .set_status_many(&ids, decision.target_status(), now)?;

        for id in &ids {
            if let Some(mut profile) = self.profiles.fetch(*id)? {
                annotate(&mut profile, decision, actor, now, CommentPolicy::Overwrite);
                self.profiles.update(profile)?;
            }
        }

        info!(
            actor,
            selected = ids.len(),
            updated,
            status = decision.target_status().label(),
            "bulk verification applied"
        );
        Ok(updated)
    }

    /// Moderator edit of a profile, including a possible status change.
    pub fn edit_profile(
        &self,
        id: ProfileId,
        edit: ProfileEdit,
        actor: &str,
    ) -> Result<Profile, TalentServiceError> {
        let mut profile = self.get_profile(id)?;

        let mut errors = FormErrors::default();
        if let Some(name) = edit.name.as_deref() {
            if name.trim().is_empty() {
                errors.add("name", "This field is required.");
            }
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        match apply_edit(&mut profile, edit, actor, self.clock.now()) {
            Ok(decision) => {
                if let Some(decision) = decision {
                    info!(
                        profile_id = %id,
                        actor,
                        status = decision.target_status().label(),
                        "profile status changed by edit"
                    );
                }
            }
            Err(err) => {
                let mut errors = FormErrors::default();
                errors.add("verification_status", err.to_string());
                return Err(errors.into());
            }
        }

        self.profiles.update(profile.clone())?;
        Ok(profile)
    }

    /// Moderation listing: narrower search, optional status filter, paginated.
    pub fn admin_profiles(
        &self,
        filter: &AdminProfileFilter,
        page: usize,
    ) -> Result<Page<Profile>, TalentServiceError> {
        let mut profiles: Vec<Profile> = self
            .profiles
            .all()?
            .into_iter()
            .filter(|profile| filter.admits(profile))
            .collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Page::slice(profiles, page, ADMIN_PAGE_SIZE))
    }

    pub fn admin_collaborations(
        &self,
        query: &SearchQuery,
        page: usize,
    ) -> Result<Page<Collaboration>, TalentServiceError> {
        let collaborations = self.list_collaborations(query)?;
        Ok(Page::slice(collaborations, page, ADMIN_PAGE_SIZE))
    }
}

/// Error raised by the talent directory service.
#[derive(Debug, thiserror::Error)]
pub enum TalentServiceError {
    #[error(transparent)]
    Validation(#[from] FormErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TalentServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::NotFound))
    }
}
