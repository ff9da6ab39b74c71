use super::common::*;
use chrono::Duration;

use crate::talents::domain::{Profile, ProfileId, VerificationStatus};
use crate::talents::verification::{
    apply_decision, apply_edit, audit_comment, CommentPolicy, ProfileEdit, TransitionError,
    VerificationDecision,
};

fn pending_profile() -> Profile {
    Profile {
        id: ProfileId(1),
        name: "Awa Diallo".to_string(),
        skills: "Python, data viz".to_string(),
        passions: String::new(),
        languages: "French".to_string(),
        projects: String::new(),
        avatar: None,
        avatar_preset: 1,
        proof_file: None,
        verification_status: VerificationStatus::Pending,
        admin_comment: String::new(),
        created_at: start_time(),
        verified_at: None,
    }
}

#[test]
fn audit_comment_names_actor_and_time() {
    let at = start_time();
    assert_eq!(
        audit_comment(VerificationDecision::Approve, "moussa", at, false),
        "Talent approved by moussa on 14/03/2025 at 09:30"
    );
    assert_eq!(
        audit_comment(VerificationDecision::Reject, "moussa", at, true),
        "Talent bulk-rejected by moussa on 14/03/2025 at 09:30"
    );
}

#[test]
fn approving_pending_profile_stamps_time_and_comment() {
    let mut profile = pending_profile();
    let now = start_time() + Duration::hours(2);

    apply_decision(
        &mut profile,
        VerificationDecision::Approve,
        "reviewer",
        now,
        CommentPolicy::PreserveExisting,
    );

    assert_eq!(profile.verification_status, VerificationStatus::Approved);
    assert_eq!(profile.verified_at, Some(now));
    assert!(profile.admin_comment.starts_with("Talent approved by reviewer"));
    assert!(profile.is_verified());
}

#[test]
fn preserving_policy_keeps_existing_comment_across_toggles() {
    let mut profile = pending_profile();
    profile.admin_comment = "Proof file is blurry".to_string();
    let first = start_time() + Duration::hours(1);
    let second = first + Duration::hours(1);

    apply_decision(
        &mut profile,
        VerificationDecision::Reject,
        "reviewer",
        first,
        CommentPolicy::PreserveExisting,
    );
    apply_decision(
        &mut profile,
        VerificationDecision::Approve,
        "reviewer",
        second,
        CommentPolicy::PreserveExisting,
    );

    assert_eq!(profile.verification_status, VerificationStatus::Approved);
    assert_eq!(profile.verified_at, Some(second));
    assert_eq!(profile.admin_comment, "Proof file is blurry");
}

#[test]
fn overwrite_policy_replaces_existing_comment() {
    let mut profile = pending_profile();
    profile.admin_comment = "Proof file is blurry".to_string();

    apply_decision(
        &mut profile,
        VerificationDecision::Approve,
        "lead",
        start_time(),
        CommentPolicy::Overwrite,
    );

    assert_eq!(
        profile.admin_comment,
        "Talent bulk-approved by lead on 14/03/2025 at 09:30"
    );
}

#[test]
fn edit_without_status_change_leaves_verification_untouched() {
    let mut profile = pending_profile();

    let decision = apply_edit(
        &mut profile,
        ProfileEdit {
            skills: Some("Python, SQL".to_string()),
            verification_status: Some(VerificationStatus::Pending),
            ..ProfileEdit::default()
        },
        "reviewer",
        start_time(),
    )
    .expect("edit applies");

    assert!(decision.is_none());
    assert_eq!(profile.skills, "Python, SQL");
    assert!(profile.verified_at.is_none());
    assert!(profile.admin_comment.is_empty());
}

#[test]
fn edit_comment_written_alongside_status_is_kept() {
    let mut profile = pending_profile();

    let decision = apply_edit(
        &mut profile,
        ProfileEdit {
            verification_status: Some(VerificationStatus::Rejected),
            admin_comment: Some("Portfolio link is broken".to_string()),
            ..ProfileEdit::default()
        },
        "reviewer",
        start_time(),
    )
    .expect("edit applies");

    assert_eq!(decision, Some(VerificationDecision::Reject));
    assert_eq!(profile.verification_status, VerificationStatus::Rejected);
    assert_eq!(profile.admin_comment, "Portfolio link is broken");
    assert!(profile.verified_at.is_some());
}

#[test]
fn edit_cannot_return_reviewed_profile_to_pending() {
    let mut profile = pending_profile();
    apply_decision(
        &mut profile,
        VerificationDecision::Approve,
        "reviewer",
        start_time(),
        CommentPolicy::PreserveExisting,
    );
    let before = profile.clone();

    let err = apply_edit(
        &mut profile,
        ProfileEdit {
            name: Some("Renamed".to_string()),
            verification_status: Some(VerificationStatus::Pending),
            ..ProfileEdit::default()
        },
        "reviewer",
        start_time(),
    )
    .expect_err("pending is not reachable");

    assert_eq!(err, TransitionError::ReturnToPending);
    assert_eq!(profile, before, "failed edit must not mutate the profile");
}
