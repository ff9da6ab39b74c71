use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Collaboration, CollaborationId, Profile, ProfileId, StatusBadge};
use super::routes::{reverse, RouteName};
use super::search::Page;

/// Public listing entry for a profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub id: ProfileId,
    pub name: String,
    pub skills: String,
    pub passions: String,
    pub languages: String,
    pub projects: String,
    pub avatar_url: String,
    pub verification_status: &'static str,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_file: Option<ProofFileView>,
    pub created_at: DateTime<Utc>,
}

impl ProfileView {
    pub fn new(profile: &Profile, avatar_url: String, proof_url: Option<String>) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            skills: profile.skills.clone(),
            passions: profile.passions.clone(),
            languages: profile.languages.clone(),
            projects: profile.projects.clone(),
            avatar_url,
            verification_status: profile.verification_status.label(),
            is_verified: profile.is_verified(),
            proof_file: ProofFileView::new(profile, proof_url),
            created_at: profile.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProofFileView {
    pub url: String,
    pub name: String,
    pub extension: String,
    pub icon: &'static str,
}

impl ProofFileView {
    fn new(profile: &Profile, url: Option<String>) -> Option<Self> {
        let stored = profile.proof_file.as_ref()?;
        Some(Self {
            url: url?,
            name: stored.file_name().to_string(),
            extension: profile.proof_extension(),
            icon: profile.proof_icon(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CollaborationView {
    pub id: CollaborationId,
    pub title: String,
    pub description: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Collaboration> for CollaborationView {
    fn from(value: &Collaboration) -> Self {
        Self {
            id: value.id,
            title: value.title.clone(),
            description: value.description.clone(),
            email: value.email.clone(),
            created_at: value.created_at,
        }
    }
}

/// Row of the moderation changelist.
#[derive(Debug, Clone, Serialize)]
pub struct AdminProfileRow {
    pub id: ProfileId,
    pub name: String,
    pub verification_status: &'static str,
    pub badge: StatusBadge,
    pub created_at: DateTime<Utc>,
    pub has_proof_file: bool,
    pub actions: AdminActionLinks,
}

impl From<&Profile> for AdminProfileRow {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            verification_status: profile.verification_status.label(),
            badge: profile.verification_status.badge(),
            created_at: profile.created_at,
            has_proof_file: profile.proof_file.is_some(),
            actions: AdminActionLinks::for_profile(profile.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminActionLinks {
    pub approve: String,
    pub reject: String,
    pub change: String,
}

impl AdminActionLinks {
    pub fn for_profile(id: ProfileId) -> Self {
        Self {
            approve: reverse(RouteName::ApproveTalent, Some(id)),
            reject: reverse(RouteName::RejectTalent, Some(id)),
            change: reverse(RouteName::AdminProfileChange, Some(id)),
        }
    }
}

/// Full moderation view of a single profile, including the proof file preview.
#[derive(Debug, Clone, Serialize)]
pub struct AdminProfileDetail {
    #[serde(flatten)]
    pub profile: ProfileView,
    pub avatar_preset: i32,
    pub admin_comment: String,
    pub verified_at: Option<DateTime<Utc>>,
    pub badge: StatusBadge,
    pub actions: AdminActionLinks,
}

impl AdminProfileDetail {
    pub fn new(profile: &Profile, view: ProfileView) -> Self {
        Self {
            profile: view,
            avatar_preset: profile.avatar_preset,
            admin_comment: profile.admin_comment.clone(),
            verified_at: profile.verified_at,
            badge: profile.verification_status.badge(),
            actions: AdminActionLinks::for_profile(profile.id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
    Success,
    Warning,
    Error,
}

/// One-shot confirmation shown on the changelist after a moderation action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminMessage {
    pub level: MessageLevel,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub pages: usize,
}

impl<T> From<&Page<T>> for PageInfo {
    fn from(page: &Page<T>) -> Self {
        Self {
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            pages: page.page_count(),
        }
    }
}
