use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::talents::domain::{
    Collaboration, CollaborationId, Profile, ProfileId, StoredFile, VerificationStatus,
};
use crate::talents::intake::ProfileSubmission;
use crate::talents::repository::{CollaborationRepository, ProfileRepository, RepositoryError};
use crate::talents::router::{talents_router, AdminGate};
use crate::talents::service::{Clock, TalentDirectoryService};
use crate::talents::storage::{storage_path, FileStore, StorageError, UploadKind};
use crate::talents::upload::UploadedFile;

pub(super) const ADMIN_TOKEN: &str = "moderation-secret";
pub(super) const PROOF_LIMIT: usize = 10 * 1024 * 1024;

pub(super) type TestService =
    TalentDirectoryService<MemoryProfiles, MemoryCollaborations, MemoryFiles>;

pub(super) fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Clock that advances one minute on every read so records get distinct timestamps.
#[derive(Debug)]
pub(super) struct SteppingClock {
    current: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub(super) fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut guard = self.current.lock().expect("clock mutex poisoned");
        let now = *guard;
        *guard = now + Duration::minutes(1);
        now
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    pub(super) records: Arc<Mutex<BTreeMap<ProfileId, Profile>>>,
    pub(super) batch_updates: Arc<Mutex<usize>>,
}

impl MemoryProfiles {
    pub(super) fn get(&self, id: ProfileId) -> Option<Profile> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(&id)
            .cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }

    pub(super) fn batch_updates(&self) -> usize {
        *self.batch_updates.lock().expect("counter mutex poisoned")
    }
}

impl ProfileRepository for MemoryProfiles {
    fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id, profile.clone());
        Ok(profile)
    }

    fn update(&self, profile: Profile) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(profile.id, profile);
        Ok(())
    }

    fn fetch(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError> {
        Ok(self.get(id))
    }

    fn all(&self) -> Result<Vec<Profile>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn set_status_many(
        &self,
        ids: &[ProfileId],
        status: VerificationStatus,
        verified_at: DateTime<Utc>,
    ) -> Result<usize, RepositoryError> {
        *self.batch_updates.lock().expect("counter mutex poisoned") += 1;
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let mut updated = 0;
        for id in ids {
            if let Some(profile) = guard.get_mut(id) {
                profile.verification_status = status;
                profile.verified_at = Some(verified_at);
                updated += 1;
            }
        }
        Ok(updated)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCollaborations {
    records: Arc<Mutex<BTreeMap<CollaborationId, Collaboration>>>,
}

impl MemoryCollaborations {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl CollaborationRepository for MemoryCollaborations {
    fn insert(&self, collaboration: Collaboration) -> Result<Collaboration, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(collaboration.id, collaboration.clone());
        Ok(collaboration)
    }

    fn fetch(&self, id: CollaborationId) -> Result<Option<Collaboration>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Collaboration>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryFiles {
    stored: Arc<Mutex<Vec<(String, usize)>>>,
    fail_on: Option<UploadKind>,
}

impl MemoryFiles {
    /// Store whose writes for `kind` fail as if the disk were full.
    pub(super) fn failing_on(kind: UploadKind) -> Self {
        Self {
            fail_on: Some(kind),
            ..Self::default()
        }
    }

    pub(super) fn stored_paths(&self) -> Vec<String> {
        self.stored
            .lock()
            .expect("file mutex poisoned")
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }
}

impl FileStore for MemoryFiles {
    fn store(&self, kind: UploadKind, file: &UploadedFile) -> Result<StoredFile, StorageError> {
        let path = storage_path(kind, &file.file_name);
        if self.fail_on == Some(kind) {
            return Err(StorageError::Write {
                path,
                source: std::io::Error::other("disk full"),
            });
        }
        self.stored
            .lock()
            .expect("file mutex poisoned")
            .push((path.clone(), file.len()));
        Ok(StoredFile { path })
    }

    fn url(&self, stored: &StoredFile) -> String {
        format!("/media/{}", stored.path)
    }

    fn remove(&self, stored: &StoredFile) -> Result<(), StorageError> {
        self.stored
            .lock()
            .expect("file mutex poisoned")
            .retain(|(path, _)| path != &stored.path);
        Ok(())
    }
}

pub(super) struct UnavailableProfiles;

impl ProfileRepository for UnavailableProfiles {
    fn insert(&self, _profile: Profile) -> Result<Profile, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _profile: Profile) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: ProfileId) -> Result<Option<Profile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Profile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn set_status_many(
        &self,
        _ids: &[ProfileId],
        _status: VerificationStatus,
        _verified_at: DateTime<Utc>,
    ) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct Fixture {
    pub(super) service: TestService,
    pub(super) profiles: Arc<MemoryProfiles>,
    pub(super) collaborations: Arc<MemoryCollaborations>,
    pub(super) files: Arc<MemoryFiles>,
}

pub(super) fn fixture() -> Fixture {
    let profiles = Arc::new(MemoryProfiles::default());
    let collaborations = Arc::new(MemoryCollaborations::default());
    let files = Arc::new(MemoryFiles::default());
    let service = TalentDirectoryService::with_clock(
        profiles.clone(),
        collaborations.clone(),
        files.clone(),
        PROOF_LIMIT,
        Arc::new(SteppingClock::starting_at(start_time())),
    );
    Fixture {
        service,
        profiles,
        collaborations,
        files,
    }
}

pub(super) fn submission(name: &str, skills: &str) -> ProfileSubmission {
    ProfileSubmission {
        name: Some(name.to_string()),
        skills: Some(skills.to_string()),
        passions: Some("Open source, climbing".to_string()),
        languages: Some("French, English".to_string()),
        projects: Some("Built a community tool library".to_string()),
        avatar_preset: Some("3".to_string()),
        ..ProfileSubmission::default()
    }
}

pub(super) fn pdf(name: &str) -> UploadedFile {
    UploadedFile {
        file_name: name.to_string(),
        content_type: Some("application/pdf".to_string()),
        bytes: b"%PDF-1.7 sample".to_vec(),
    }
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    talents_router(
        Arc::new(service),
        AdminGate::new(Some(ADMIN_TOKEN.to_string())),
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn location(response: &Response) -> String {
    response
        .headers()
        .get(axum::http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("redirect carries a location")
        .to_string()
}
