//! Validation of uploaded avatars and proof files at the intake boundary.

/// Extensions accepted for proof files (documents, images, archives).
pub const PROOF_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "jpg", "jpeg", "png", "zip", "rar"];

/// Extensions accepted for custom avatar images.
pub const AVATAR_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Raw file received from a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercased extension after the final dot, if any.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.trim().to_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Rules applied to one kind of upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub allowed_extensions: &'static [&'static str],
    pub max_bytes: Option<usize>,
}

impl UploadPolicy {
    pub fn proof(max_bytes: usize) -> Self {
        Self {
            allowed_extensions: PROOF_EXTENSIONS,
            max_bytes: Some(max_bytes),
        }
    }

    pub fn avatar() -> Self {
        Self {
            allowed_extensions: AVATAR_EXTENSIONS,
            max_bytes: None,
        }
    }

    pub fn check(&self, file: &UploadedFile) -> Result<(), UploadRejection> {
        if file.is_empty() {
            return Err(UploadRejection::Empty);
        }

        let extension = file.extension().unwrap_or_default();
        if !self.allowed_extensions.contains(&extension.as_str()) {
            return Err(UploadRejection::Extension {
                found: extension,
                allowed: self.allowed_extensions.join(", "),
            });
        }

        if let Some(max) = self.max_bytes {
            if file.len() > max {
                return Err(UploadRejection::TooLarge {
                    max_mb: max / 1024 / 1024,
                    found: file.len(),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("the submitted file is empty")]
    Empty,
    #[error("file extension \"{found}\" is not allowed; allowed extensions are: {allowed}")]
    Extension { found: String, allowed: String },
    #[error("file size exceeds the {max_mb} MB limit")]
    TooLarge { max_mb: usize, found: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: usize) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: None,
            bytes: vec![0u8; size],
        }
    }

    #[test]
    fn proof_policy_rejects_executables() {
        let policy = UploadPolicy::proof(1024);
        let err = policy.check(&file("setup.exe", 10)).expect_err("exe refused");
        assert!(matches!(err, UploadRejection::Extension { ref found, .. } if found == "exe"));
    }

    #[test]
    fn proof_policy_enforces_ceiling() {
        let policy = UploadPolicy::proof(2 * 1024 * 1024);
        assert!(policy.check(&file("cv.PDF", 2 * 1024 * 1024)).is_ok());
        let err = policy
            .check(&file("cv.pdf", 2 * 1024 * 1024 + 1))
            .expect_err("oversized refused");
        assert_eq!(err.to_string(), "file size exceeds the 2 MB limit");
    }

    #[test]
    fn avatar_policy_requires_image_extension() {
        let policy = UploadPolicy::avatar();
        assert!(policy.check(&file("me.webp", 4)).is_ok());
        assert!(policy.check(&file("me", 4)).is_err());
        assert!(policy.check(&file("me.pdf", 4)).is_err());
    }
}
