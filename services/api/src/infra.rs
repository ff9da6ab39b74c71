use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talent_directory::talents::{
    Collaboration, CollaborationId, CollaborationRepository, FileStore, Profile, ProfileId,
    ProfileRepository, RepositoryError, StorageError, StoredFile, UploadKind, UploadedFile,
    VerificationStatus,
};
use talent_directory::talents::storage::storage_path;
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) media_root: Arc<PathBuf>,
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("repository mutex poisoned".to_string())
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    records: Arc<Mutex<BTreeMap<ProfileId, Profile>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        if guard.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id, profile.clone());
        Ok(profile)
    }

    fn update(&self, profile: Profile) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        if guard.contains_key(&profile.id) {
            guard.insert(profile.id, profile);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Profile>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }

    fn set_status_many(
        &self,
        ids: &[ProfileId],
        status: VerificationStatus,
        verified_at: DateTime<Utc>,
    ) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
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
pub(crate) struct InMemoryCollaborationRepository {
    records: Arc<Mutex<BTreeMap<CollaborationId, Collaboration>>>,
}

impl CollaborationRepository for InMemoryCollaborationRepository {
    fn insert(&self, collaboration: Collaboration) -> Result<Collaboration, RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        if guard.contains_key(&collaboration.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(collaboration.id, collaboration.clone());
        Ok(collaboration)
    }

    fn fetch(&self, id: CollaborationId) -> Result<Option<Collaboration>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Collaboration>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }
}

/// Writes uploads below a media root and serves them under a URL prefix.
#[derive(Debug, Clone)]
pub(crate) struct LocalFileStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalFileStore {
    pub(crate) fn new(root: PathBuf, url_prefix: impl Into<String>) -> Self {
        Self {
            root,
            url_prefix: url_prefix.into(),
        }
    }
}

impl FileStore for LocalFileStore {
    fn store(&self, kind: UploadKind, file: &UploadedFile) -> Result<StoredFile, StorageError> {
        let relative = storage_path(kind, &file.file_name);
        let target = self.root.join(&relative);
        let write_error = |source: std::io::Error| StorageError::Write {
            path: relative.clone(),
            source,
        };

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(&target, &file.bytes).map_err(write_error)?;

        debug!(path = %relative, bytes = file.len(), "stored upload");
        Ok(StoredFile { path: relative })
    }

    fn url(&self, stored: &StoredFile) -> String {
        format!("{}{}", self.url_prefix, stored.path)
    }

    fn remove(&self, stored: &StoredFile) -> Result<(), StorageError> {
        match std::fs::remove_file(self.root.join(&stored.path)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Remove {
                path: stored.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "talent-directory-{label}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn local_store_writes_under_kind_folder() {
        let root = scratch_dir("store");
        let store = LocalFileStore::new(root.clone(), "/media/");
        let file = UploadedFile {
            file_name: "cv final.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: b"%PDF-1.5".to_vec(),
        };

        let stored = store.store(UploadKind::Proof, &file).expect("stored");

        assert!(stored.path.starts_with("proofs/"));
        assert!(stored.path.ends_with("-cv_final.pdf"));
        let written = std::fs::read(root.join(&stored.path)).expect("file on disk");
        assert_eq!(written, b"%PDF-1.5");
        assert_eq!(store.url(&stored), format!("/media/{}", stored.path));

        store.remove(&stored).expect("removed");
        assert!(!root.join(&stored.path).exists());
        store.remove(&stored).expect("removing twice is fine");

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn unknown_profile_update_is_not_found() {
        let repository = InMemoryProfileRepository::default();
        let profile = Profile {
            id: ProfileId(3),
            name: "Awa".to_string(),
            skills: String::new(),
            passions: String::new(),
            languages: String::new(),
            projects: String::new(),
            avatar: None,
            avatar_preset: 1,
            proof_file: None,
            verification_status: VerificationStatus::Pending,
            admin_comment: String::new(),
            created_at: Utc::now(),
            verified_at: None,
        };

        assert!(matches!(
            repository.update(profile.clone()),
            Err(RepositoryError::NotFound)
        ));
        repository.insert(profile.clone()).expect("insert");
        assert!(matches!(
            repository.insert(profile),
            Err(RepositoryError::Conflict)
        ));
        let updated = repository
            .set_status_many(&[ProfileId(3), ProfileId(9)], VerificationStatus::Approved, Utc::now())
            .expect("batch");
        assert_eq!(updated, 1);
    }
}
