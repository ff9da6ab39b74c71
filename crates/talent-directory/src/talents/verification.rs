//! Profile verification transitions driven by moderators.
//!
//! `pending` is the only initial state; `approved` and `rejected` can be toggled between
//! freely but nothing leads back to `pending`. Every transition re-stamps `verified_at`.
//! Whether an existing moderator comment survives depends on the [`CommentPolicy`] of the
//! calling path: single actions and direct edits keep it, bulk actions always replace it.

use chrono::{DateTime, Utc};

use super::domain::{Profile, VerificationStatus};

const COMMENT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y at %H:%M";

/// Outcome a moderator can choose for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationDecision {
    Approve,
    Reject,
}

impl VerificationDecision {
    pub const fn target_status(self) -> VerificationStatus {
        match self {
            VerificationDecision::Approve => VerificationStatus::Approved,
            VerificationDecision::Reject => VerificationStatus::Rejected,
        }
    }

    /// Map a requested status onto a decision; `pending` has no decision.
    pub fn for_status(status: VerificationStatus) -> Option<Self> {
        match status {
            VerificationStatus::Approved => Some(Self::Approve),
            VerificationStatus::Rejected => Some(Self::Reject),
            VerificationStatus::Pending => None,
        }
    }

    fn verb(self, bulk: bool) -> &'static str {
        match (self, bulk) {
            (VerificationDecision::Approve, false) => "approved",
            (VerificationDecision::Approve, true) => "bulk-approved",
            (VerificationDecision::Reject, false) => "rejected",
            (VerificationDecision::Reject, true) => "bulk-rejected",
        }
    }
}

/// How a transition treats a comment that is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPolicy {
    PreserveExisting,
    Overwrite,
}

/// Audit line naming the acting moderator and the time of the decision.
pub fn audit_comment(
    decision: VerificationDecision,
    actor: &str,
    at: DateTime<Utc>,
    bulk: bool,
) -> String {
    format!(
        "Talent {} by {} on {}",
        decision.verb(bulk),
        actor,
        at.format(COMMENT_TIMESTAMP_FORMAT)
    )
}

/// Move the profile into the decision's status and stamp the verification time.
pub fn transition(profile: &mut Profile, decision: VerificationDecision, now: DateTime<Utc>) {
    profile.verification_status = decision.target_status();
    profile.verified_at = Some(now);
}

/// Synthesize the audit comment according to `policy`.
pub fn annotate(
    profile: &mut Profile,
    decision: VerificationDecision,
    actor: &str,
    now: DateTime<Utc>,
    policy: CommentPolicy,
) {
    match policy {
        CommentPolicy::PreserveExisting if !profile.admin_comment.trim().is_empty() => {}
        CommentPolicy::PreserveExisting => {
            profile.admin_comment = audit_comment(decision, actor, now, false);
        }
        CommentPolicy::Overwrite => {
            profile.admin_comment = audit_comment(decision, actor, now, true);
        }
    }
}

pub fn apply_decision(
    profile: &mut Profile,
    decision: VerificationDecision,
    actor: &str,
    now: DateTime<Utc>,
    policy: CommentPolicy,
) {
    transition(profile, decision, now);
    annotate(profile, decision, actor, now, policy);
}

/// Field changes submitted from the moderation edit screen.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct ProfileEdit {
    pub name: Option<String>,
    pub skills: Option<String>,
    pub passions: Option<String>,
    pub languages: Option<String>,
    pub projects: Option<String>,
    pub avatar_preset: Option<i32>,
    pub verification_status: Option<VerificationStatus>,
    pub admin_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("a reviewed profile cannot return to pending")]
    ReturnToPending,
}

/// Apply a moderator edit. A status change behaves like a single action, evaluated
/// against the comment as it reads after the edit.
pub fn apply_edit(
    profile: &mut Profile,
    edit: ProfileEdit,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<Option<VerificationDecision>, TransitionError> {
    let decision = match edit.verification_status {
        Some(status) if status != profile.verification_status => {
            Some(VerificationDecision::for_status(status).ok_or(TransitionError::ReturnToPending)?)
        }
        _ => None,
    };

    let ProfileEdit {
        name,
        skills,
        passions,
        languages,
        projects,
        avatar_preset,
        admin_comment,
        ..
    } = edit;

    if let Some(name) = name {
        profile.name = name;
    }
    if let Some(skills) = skills {
        profile.skills = skills;
    }
    if let Some(passions) = passions {
        profile.passions = passions;
    }
    if let Some(languages) = languages {
        profile.languages = languages;
    }
    if let Some(projects) = projects {
        profile.projects = projects;
    }
    if let Some(preset) = avatar_preset {
        profile.avatar_preset = preset;
    }
    if let Some(comment) = admin_comment {
        profile.admin_comment = comment;
    }

    if let Some(decision) = decision {
        apply_decision(profile, decision, actor, now, CommentPolicy::PreserveExisting);
    }

    Ok(decision)
}
