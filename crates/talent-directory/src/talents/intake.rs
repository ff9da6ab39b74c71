use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::avatar::parse_avatar_preset;
use super::domain::{
    NewCollaboration, NewProfile, COLLABORATION_TITLE_MAX_CHARS, DEFAULT_PROFILE_NAME,
    LANGUAGES_MAX_CHARS, PROFILE_NAME_MAX_CHARS,
};
use super::upload::{UploadPolicy, UploadedFile};

/// Raw profile form values as received from the public intake form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSubmission {
    pub name: Option<String>,
    pub skills: Option<String>,
    pub passions: Option<String>,
    pub languages: Option<String>,
    pub projects: Option<String>,
    pub avatar_preset: Option<String>,
    pub avatar: Option<UploadedFile>,
    pub proof_file: Option<UploadedFile>,
    /// Accepted from the wire but never trusted; new profiles always start pending.
    pub verification_status: Option<String>,
}

/// Raw collaboration form values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborationSubmission {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub email: String,
}

/// Field-level validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid form fields: {}", fields.join(", "))
    }
}

impl std::error::Error for FormErrors {}

/// Profile values plus the uploads that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProfile {
    pub profile: NewProfile,
    pub avatar: Option<UploadedFile>,
    pub proof_file: Option<UploadedFile>,
}

/// Guard turning raw submissions into persistable values.
#[derive(Debug, Clone)]
pub struct IntakeGuard {
    proof_policy: UploadPolicy,
    avatar_policy: UploadPolicy,
}

impl IntakeGuard {
    pub fn new(proof_max_bytes: usize) -> Self {
        Self {
            proof_policy: UploadPolicy::proof(proof_max_bytes),
            avatar_policy: UploadPolicy::avatar(),
        }
    }

    pub fn validate_profile(
        &self,
        submission: ProfileSubmission,
    ) -> Result<ValidatedProfile, FormErrors> {
        let mut errors = FormErrors::default();

        let name = match submission.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_PROFILE_NAME.to_string(),
        };
        check_length(&mut errors, "name", &name, PROFILE_NAME_MAX_CHARS);

        let languages = text(submission.languages);
        check_length(&mut errors, "languages", &languages, LANGUAGES_MAX_CHARS);

        let avatar = non_empty_upload(submission.avatar);
        if let Some(file) = &avatar {
            if let Err(rejection) = self.avatar_policy.check(file) {
                errors.add("avatar", rejection.to_string());
            }
        }

        let proof_file = non_empty_upload(submission.proof_file);
        if let Some(file) = &proof_file {
            if let Err(rejection) = self.proof_policy.check(file) {
                errors.add("proof_file", rejection.to_string());
            }
        }

        let profile = NewProfile {
            name,
            skills: text(submission.skills),
            passions: text(submission.passions),
            languages,
            projects: text(submission.projects),
            avatar_preset: parse_avatar_preset(submission.avatar_preset.as_deref()),
        };

        errors.into_result(ValidatedProfile {
            profile,
            avatar,
            proof_file,
        })
    }

    pub fn validate_collaboration(
        &self,
        submission: CollaborationSubmission,
    ) -> Result<NewCollaboration, FormErrors> {
        let mut errors = FormErrors::default();

        let title = submission.title.trim().to_string();
        if title.is_empty() {
            errors.add("title", "This field is required.");
        }
        check_length(&mut errors, "title", &title, COLLABORATION_TITLE_MAX_CHARS);

        let description = submission.description.trim().to_string();
        if description.is_empty() {
            errors.add("description", "This field is required.");
        }

        let email = submission.email.trim().to_string();
        if email.is_empty() {
            errors.add("email", "This field is required.");
        } else if !email.validate_email() {
            errors.add("email", "Enter a valid email address.");
        }

        errors.into_result(NewCollaboration {
            title,
            description,
            email,
        })
    }
}

fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

// Browsers send an empty part when no file is chosen.
fn non_empty_upload(file: Option<UploadedFile>) -> Option<UploadedFile> {
    file.filter(|f| !(f.is_empty() && f.file_name.trim().is_empty()))
}

fn check_length(errors: &mut FormErrors, field: &str, value: &str, max: usize) {
    let count = value.chars().count();
    if count > max {
        errors.add(
            field,
            format!("Ensure this value has at most {max} characters (it has {count})."),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> IntakeGuard {
        IntakeGuard::new(10 * 1024 * 1024)
    }

    #[test]
    fn missing_name_uses_placeholder() {
        let validated = guard()
            .validate_profile(ProfileSubmission::default())
            .expect("empty profile is acceptable");
        assert_eq!(validated.profile.name, DEFAULT_PROFILE_NAME);
        assert_eq!(validated.profile.avatar_preset, 1);
    }

    #[test]
    fn collects_every_collaboration_error() {
        let errors = guard()
            .validate_collaboration(CollaborationSubmission {
                title: " ".to_string(),
                description: String::new(),
                email: "not-an-address".to_string(),
            })
            .expect_err("invalid submission");

        assert_eq!(errors.fields().collect::<Vec<_>>(), ["description", "email", "title"]);
        assert_eq!(errors.field("email"), ["Enter a valid email address."]);
    }

    #[test]
    fn empty_file_part_counts_as_no_upload() {
        let submission = ProfileSubmission {
            proof_file: Some(UploadedFile {
                file_name: String::new(),
                content_type: Some("application/octet-stream".to_string()),
                bytes: Vec::new(),
            }),
            ..ProfileSubmission::default()
        };
        let validated = guard().validate_profile(submission).expect("valid");
        assert!(validated.proof_file.is_none());
    }

    #[test]
    fn overlong_languages_are_flagged() {
        let submission = ProfileSubmission {
            languages: Some("x".repeat(LANGUAGES_MAX_CHARS + 1)),
            ..ProfileSubmission::default()
        };
        let errors = guard().validate_profile(submission).expect_err("too long");
        assert_eq!(errors.field("languages").len(), 1);
    }
}
