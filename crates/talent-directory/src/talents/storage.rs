use super::domain::StoredFile;
use super::upload::UploadedFile;

/// Destination folder for an uploaded artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Avatar,
    Proof,
}

impl UploadKind {
    pub const fn folder(self) -> &'static str {
        match self {
            UploadKind::Avatar => "avatars",
            UploadKind::Proof => "proofs",
        }
    }
}

/// Storage abstraction for avatars and proof files.
pub trait FileStore: Send + Sync {
    fn store(&self, kind: UploadKind, file: &UploadedFile) -> Result<StoredFile, StorageError>;
    fn url(&self, stored: &StoredFile) -> String;
    /// Delete a stored file; a file that is already gone is not an error.
    fn remove(&self, stored: &StoredFile) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to write upload '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to remove upload '{path}': {source}")]
    Remove {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Storage-relative path for a new upload: `{folder}/{uuid}-{sanitized name}`.
pub fn storage_path(kind: UploadKind, file_name: &str) -> String {
    format!(
        "{}/{}-{}",
        kind.folder(),
        uuid::Uuid::new_v4().simple(),
        sanitize_filename(file_name)
    )
}

/// Strip directories and replace anything outside `[A-Za-z0-9._-]`.
pub fn sanitize_filename(file_name: &str) -> String {
    const MAX_FILENAME_CHARS: usize = 120;

    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim();

    let sanitized: String = base
        .chars()
        .take(MAX_FILENAME_CHARS)
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = sanitized.trim_start_matches('.').to_string();
    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\docs\\my cv.pdf"), "my_cv.pdf");
        assert_eq!(sanitize_filename("..."), "upload");
        assert_eq!(sanitize_filename(".hidden.png"), "hidden.png");
    }

    #[test]
    fn storage_path_lands_in_kind_folder() {
        let path = storage_path(UploadKind::Proof, "portfolio.pdf");
        assert!(path.starts_with("proofs/"));
        assert!(path.ends_with("-portfolio.pdf"));
    }
}
