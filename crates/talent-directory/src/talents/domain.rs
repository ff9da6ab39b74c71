use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder used when a submission omits its display name.
pub const DEFAULT_PROFILE_NAME: &str = "Anonymous";
pub const PROFILE_NAME_MAX_CHARS: usize = 150;
pub const LANGUAGES_MAX_CHARS: usize = 200;
pub const COLLABORATION_TITLE_MAX_CHARS: usize = 200;

/// Identifier wrapper for submitted talent profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub u64);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for collaboration proposals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollaborationId(pub u64);

impl fmt::Display for CollaborationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Moderation state of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Approved => "approved",
            VerificationStatus::Rejected => "rejected",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "Pending",
            VerificationStatus::Approved => "Approved",
            VerificationStatus::Rejected => "Rejected",
        }
    }

    /// Colour and marker text shown in the moderation list.
    pub fn badge(self) -> StatusBadge {
        let (color, marker) = match self {
            VerificationStatus::Pending => ("orange", "⏳"),
            VerificationStatus::Approved => ("green", "✅"),
            VerificationStatus::Rejected => ("red", "❌"),
        };
        StatusBadge {
            color,
            text: format!("{marker} {}", self.display_name()),
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown verification status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for VerificationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub color: &'static str,
    pub text: String,
}

/// Storage-relative location of an uploaded artifact, e.g. `proofs/3f2c-cv.pdf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub path: String,
}

impl StoredFile {
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Lowercased extension, or an empty string when the name has no dot.
    pub fn extension(&self) -> String {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => String::new(),
        }
    }
}

/// A submitted talent record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub skills: String,
    pub passions: String,
    pub languages: String,
    pub projects: String,
    pub avatar: Option<StoredFile>,
    pub avatar_preset: i32,
    pub proof_file: Option<StoredFile>,
    pub verification_status: VerificationStatus,
    pub admin_comment: String,
    pub created_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Approved
    }

    pub fn proof_extension(&self) -> String {
        self.proof_file
            .as_ref()
            .map(StoredFile::extension)
            .unwrap_or_default()
    }

    /// Icon class for the proof file, keyed on its extension.
    pub fn proof_icon(&self) -> &'static str {
        match self.proof_extension().as_str() {
            "pdf" => "fa-file-pdf",
            "doc" | "docx" => "fa-file-word",
            "jpg" | "jpeg" | "png" | "gif" => "fa-file-image",
            "zip" | "rar" => "fa-file-archive",
            _ => "fa-file",
        }
    }
}

/// Validated profile values ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub name: String,
    pub skills: String,
    pub passions: String,
    pub languages: String,
    pub projects: String,
    pub avatar_preset: i32,
}

/// A submitted collaboration proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaboration {
    pub id: CollaborationId,
    pub title: String,
    pub description: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Validated collaboration values ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCollaboration {
    pub title: String,
    pub description: String,
    pub email: String,
}
