use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartError, DefaultBodyLimit, Multipart, Path, Query, Request, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post, MethodRouter},
    Extension, Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use subtle::ConstantTimeEq;
use tracing::{error, warn};

use super::domain::{Profile, ProfileId, VerificationStatus};
use super::intake::{CollaborationSubmission, FormErrors, ProfileSubmission};
use super::repository::{CollaborationRepository, ProfileRepository};
use super::routes::{path, RouteName, ROUTES};
use super::search::{AdminProfileFilter, SearchQuery};
use super::service::{TalentDirectoryService, TalentServiceError};
use super::storage::FileStore;
use super::upload::{UploadRejection, UploadedFile};
use super::verification::ProfileEdit;
use super::views::{
    AdminMessage, AdminProfileDetail, AdminProfileRow, CollaborationView, MessageLevel, PageInfo,
    ProfileView,
};

/// Header naming the moderator on whose behalf an admin request is made.
pub const ADMIN_USER_HEADER: &str = "x-admin-user";
const DEFAULT_ADMIN_USER: &str = "admin";

/// Bearer-token check guarding the moderation routes.
#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    token: Option<String>,
}

impl AdminGate {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    /// Returns the acting moderator's name when the request carries the admin token.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<String, AdminDenied> {
        let expected = self.token.as_deref().ok_or(AdminDenied::Disabled)?;
        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(AdminDenied::MissingCredentials)?;

        if !secure_compare(presented, expected) {
            return Err(AdminDenied::InvalidToken);
        }

        let actor = headers
            .get(ADMIN_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_ADMIN_USER);
        Ok(actor.to_string())
    }
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Moderator name attached to requests that passed the admin gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminActor(pub String);

async fn require_admin(
    State(admin): State<Arc<AdminGate>>,
    mut request: Request,
    next: Next,
) -> Response {
    match admin.authorize(request.headers()) {
        Ok(actor) => {
            request.extensions_mut().insert(AdminActor(actor));
            next.run(request).await
        }
        Err(denied) => {
            warn!(path = %request.uri().path(), reason = %denied, "admin request refused");
            denied.into_response()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AdminDenied {
    #[error("admin access is not configured")]
    Disabled,
    #[error("admin credentials required")]
    MissingCredentials,
    #[error("invalid admin credentials")]
    InvalidToken,
}

impl IntoResponse for AdminDenied {
    fn into_response(self) -> Response {
        let status = match self {
            AdminDenied::Disabled => StatusCode::FORBIDDEN,
            AdminDenied::MissingCredentials | AdminDenied::InvalidToken => StatusCode::UNAUTHORIZED,
        };
        let mut response = (status, Json(json!({ "error": self.to_string() }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Router state shared by every handler.
pub struct TalentsState<P, C, F> {
    pub service: Arc<TalentDirectoryService<P, C, F>>,
}

impl<P, C, F> Clone for TalentsState<P, C, F> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Router builder mounting every entry of the route table; admin-only entries sit
/// behind the admin gate.
pub fn talents_router<P, C, F>(
    service: Arc<TalentDirectoryService<P, C, F>>,
    admin: AdminGate,
) -> Router
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    // room for a full-size proof, an avatar, and the text fields
    let body_limit = service
        .proof_max_bytes()
        .saturating_mul(2)
        .saturating_add(1024 * 1024);

    let admin = Arc::new(admin);
    let mut router = Router::new();
    for entry in ROUTES {
        let mut route = method_router::<P, C, F>(entry.name);
        if entry.admin_only {
            route = route.route_layer(middleware::from_fn_with_state(
                Arc::clone(&admin),
                require_admin,
            ));
        }
        router = router.route(entry.path, route);
    }

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(TalentsState { service })
}

fn method_router<P, C, F>(name: RouteName) -> MethodRouter<TalentsState<P, C, F>>
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    match name {
        RouteName::TalentList => {
            get(talent_list_handler::<P, C, F>).post(submit_profile_handler::<P, C, F>)
        }
        RouteName::CollaborationList => get(collaboration_list_handler::<P, C, F>)
            .post(submit_collaboration_handler::<P, C, F>),
        RouteName::AdminProfileChangelist => get(admin_changelist_handler::<P, C, F>),
        RouteName::AdminProfileChange => {
            get(admin_change_handler::<P, C, F>).post(admin_edit_handler::<P, C, F>)
        }
        RouteName::AdminProfileBulkAction => post(bulk_action_handler::<P, C, F>),
        RouteName::ApproveTalent => get(approve_handler::<P, C, F>),
        RouteName::RejectTalent => get(reject_handler::<P, C, F>),
        RouteName::AdminCollaborationChangelist => {
            get(admin_collaborations_handler::<P, C, F>)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub success: Option<String>,
}

impl ListingParams {
    fn query(&self) -> SearchQuery {
        SearchQuery::new(self.q.as_deref())
    }

    fn succeeded(&self) -> bool {
        self.success.as_deref() == Some("1")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormState<T> {
    pub errors: FormErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<T>,
}

impl<T> Default for FormState<T> {
    fn default() -> Self {
        Self {
            errors: FormErrors::default(),
            values: None,
        }
    }
}

/// Text values echoed back into the profile form after a failed submission.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileFormValues {
    pub name: Option<String>,
    pub skills: Option<String>,
    pub passions: Option<String>,
    pub languages: Option<String>,
    pub projects: Option<String>,
    pub avatar_preset: Option<String>,
}

impl From<&ProfileSubmission> for ProfileFormValues {
    fn from(value: &ProfileSubmission) -> Self {
        Self {
            name: value.name.clone(),
            skills: value.skills.clone(),
            passions: value.passions.clone(),
            languages: value.languages.clone(),
            projects: value.projects.clone(),
            avatar_preset: value.avatar_preset.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileListing {
    pub query: String,
    pub success: bool,
    pub profiles: Vec<ProfileView>,
    pub profile_form: FormState<ProfileFormValues>,
}

#[derive(Debug, Serialize)]
pub struct CollaborationListing {
    pub query: String,
    pub success: bool,
    pub collaborations: Vec<CollaborationView>,
    pub form: FormState<CollaborationSubmission>,
}

fn profile_listing<P, C, F>(
    service: &TalentDirectoryService<P, C, F>,
    params: &ListingParams,
    profile_form: FormState<ProfileFormValues>,
) -> Result<ProfileListing, TalentServiceError>
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    let profiles = service
        .list_profiles(&params.query())?
        .iter()
        .map(|profile| profile_view(service, profile))
        .collect();

    Ok(ProfileListing {
        query: params.q.clone().unwrap_or_default(),
        success: params.succeeded(),
        profiles,
        profile_form,
    })
}

fn profile_view<P, C, F>(
    service: &TalentDirectoryService<P, C, F>,
    profile: &Profile,
) -> ProfileView
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    let proof_url = profile
        .proof_file
        .as_ref()
        .map(|stored| service.file_url(stored));
    ProfileView::new(profile, service.avatar_url(profile), proof_url)
}

fn collaboration_listing<P, C, F>(
    service: &TalentDirectoryService<P, C, F>,
    params: &ListingParams,
    form: FormState<CollaborationSubmission>,
) -> Result<CollaborationListing, TalentServiceError>
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    let collaborations = service
        .list_collaborations(&params.query())?
        .iter()
        .map(CollaborationView::from)
        .collect();

    Ok(CollaborationListing {
        query: params.q.clone().unwrap_or_default(),
        success: params.succeeded(),
        collaborations,
        form,
    })
}

fn success_redirect(route: RouteName) -> Response {
    Redirect::to(&format!("{}?success=1", path(route))).into_response()
}

fn service_error_response(err: TalentServiceError) -> Response {
    match err {
        TalentServiceError::Validation(errors) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "errors": errors }))).into_response()
        }
        err if err.is_not_found() => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": err.to_string() }))).into_response()
        }
        other => {
            error!(error = %other, "talent directory request failed");
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn talent_list_handler<P, C, F>(
    State(state): State<TalentsState<P, C, F>>,
    Query(params): Query<ListingParams>,
) -> Response
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    match profile_listing(&state.service, &params, FormState::default()) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn submit_profile_handler<P, C, F>(
    State(state): State<TalentsState<P, C, F>>,
    Query(params): Query<ListingParams>,
    multipart: Multipart,
) -> Response
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    let form = match read_profile_form(multipart, state.service.proof_max_bytes()).await {
        Ok(form) => form,
        Err(err) => {
            warn!(error = %err, "unreadable profile form");
            let payload = json!({ "error": format!("unreadable form data: {err}") });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    let values = ProfileFormValues::from(&form.submission);
    let outcome = if form.errors.is_empty() {
        state.service.submit_profile(form.submission)
    } else {
        Err(TalentServiceError::Validation(form.errors))
    };
    match outcome {
        Ok(_) => success_redirect(RouteName::TalentList),
        Err(TalentServiceError::Validation(errors)) => {
            let form = FormState {
                errors,
                values: Some(values),
            };
            match profile_listing(&state.service, &params, form) {
                Ok(listing) => (StatusCode::UNPROCESSABLE_ENTITY, Json(listing)).into_response(),
                Err(err) => service_error_response(err),
            }
        }
        Err(err) => service_error_response(err),
    }
}

const AVATAR_FIELD: &str = "avatar";
const PROOF_FIELD: &str = "proof_file";

/// Multipart profile form as read off the wire, plus errors found while reading it.
#[derive(Debug, Default)]
pub struct ProfileForm {
    pub submission: ProfileSubmission,
    pub errors: FormErrors,
}

/// Collect the multipart profile form. Unknown fields are ignored.
///
/// A proof part larger than `proof_max_bytes` is discarded while streaming, and a
/// body cut off by the request limit ends the read; both become field errors so the
/// form can be re-rendered instead of failing the request.
pub async fn read_profile_form(
    mut multipart: Multipart,
    proof_max_bytes: usize,
) -> Result<ProfileForm, MultipartError> {
    let mut form = ProfileForm::default();
    let oversized = |field: &str, found: usize| -> String {
        if field == PROOF_FIELD {
            UploadRejection::TooLarge {
                max_mb: proof_max_bytes / 1024 / 1024,
                found,
            }
            .to_string()
        } else {
            "The submitted form exceeds the upload size limit.".to_string()
        }
    };

    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) if body_limit_hit(&err) => {
                form.errors.add(PROOF_FIELD, oversized(PROOF_FIELD, 0));
                break;
            }
            Err(err) => return Err(err),
        };
        let name = field.name().unwrap_or_default().to_string();

        if name == AVATAR_FIELD || name == PROOF_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let cap = (name == PROOF_FIELD).then_some(proof_max_bytes);

            let mut bytes = Vec::new();
            let mut received = 0usize;
            let mut truncated = false;
            loop {
                match field.chunk().await {
                    Ok(Some(chunk)) => {
                        received = received.saturating_add(chunk.len());
                        if cap.is_some_and(|max| received > max) {
                            bytes = Vec::new();
                        } else {
                            bytes.extend_from_slice(&chunk);
                        }
                    }
                    Ok(None) => break,
                    Err(err) if body_limit_hit(&err) => {
                        truncated = true;
                        break;
                    }
                    Err(err) => return Err(err),
                }
            }

            if truncated || cap.is_some_and(|max| received > max) {
                form.errors.add(&name, oversized(&name, received));
                if truncated {
                    break;
                }
                continue;
            }

            let file = UploadedFile {
                file_name,
                content_type,
                bytes,
            };
            if name == AVATAR_FIELD {
                form.submission.avatar = Some(file);
            } else {
                form.submission.proof_file = Some(file);
            }
            continue;
        }

        let value = match field.text().await {
            Ok(value) => value,
            Err(err) if body_limit_hit(&err) => {
                form.errors.add(PROOF_FIELD, oversized(PROOF_FIELD, 0));
                break;
            }
            Err(err) => return Err(err),
        };
        let submission = &mut form.submission;
        match name.as_str() {
            "name" => submission.name = Some(value),
            "skills" => submission.skills = Some(value),
            "passions" => submission.passions = Some(value),
            "languages" => submission.languages = Some(value),
            "projects" => submission.projects = Some(value),
            "avatar_preset" => submission.avatar_preset = Some(value),
            "verification_status" => submission.verification_status = Some(value),
            _ => {}
        }
    }

    Ok(form)
}

fn body_limit_hit(err: &MultipartError) -> bool {
    err.status() == StatusCode::PAYLOAD_TOO_LARGE
}

pub(crate) async fn collaboration_list_handler<P, C, F>(
    State(state): State<TalentsState<P, C, F>>,
    Query(params): Query<ListingParams>,
) -> Response
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    match collaboration_listing(&state.service, &params, FormState::default()) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn submit_collaboration_handler<P, C, F>(
    State(state): State<TalentsState<P, C, F>>,
    Query(params): Query<ListingParams>,
    Form(submission): Form<CollaborationSubmission>,
) -> Response
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    match state.service.submit_collaboration(submission.clone()) {
        Ok(_) => success_redirect(RouteName::CollaborationList),
        Err(TalentServiceError::Validation(errors)) => {
            let form = FormState {
                errors,
                values: Some(submission),
            };
            match collaboration_listing(&state.service, &params, form) {
                Ok(listing) => (StatusCode::UNPROCESSABLE_ENTITY, Json(listing)).into_response(),
                Err(err) => service_error_response(err),
            }
        }
        Err(err) => service_error_response(err),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminListParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub notice: Option<String>,
    #[serde(default)]
    pub profile: Option<u64>,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AdminChangelist {
    pub messages: Vec<AdminMessage>,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VerificationStatus>,
    pub page: PageInfo,
    pub results: Vec<AdminProfileRow>,
}

pub(crate) async fn admin_changelist_handler<P, C, F>(
    State(state): State<TalentsState<P, C, F>>,
    Query(params): Query<AdminListParams>,
) -> Response
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    let filter = AdminProfileFilter {
        query: SearchQuery::new(params.q.as_deref()),
        status: params
            .status
            .as_deref()
            .and_then(|raw| raw.parse::<VerificationStatus>().ok()),
    };

    let page = match state
        .service
        .admin_profiles(&filter, params.page.unwrap_or(1))
    {
        Ok(page) => page,
        Err(err) => return service_error_response(err),
    };

    let messages = notice_message(&state.service, &params)
        .into_iter()
        .collect();

    let body = AdminChangelist {
        messages,
        query: params.q.clone().unwrap_or_default(),
        status: filter.status,
        page: PageInfo::from(&page),
        results: page.items.iter().map(AdminProfileRow::from).collect(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Turn the `notice` left by a moderation redirect into a displayable message.
fn notice_message<P, C, F>(
    service: &TalentDirectoryService<P, C, F>,
    params: &AdminListParams,
) -> Option<AdminMessage>
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    let profile_name = || {
        params
            .profile
            .and_then(|id| service.get_profile(ProfileId(id)).ok())
            .map(|profile| profile.name)
            .unwrap_or_else(|| "unknown".to_string())
    };
    let count = params.count.unwrap_or(0);

    let (level, text) = match params.notice.as_deref()? {
        "approved" => (
            MessageLevel::Success,
            format!("The talent \"{}\" was approved successfully. ✅", profile_name()),
        ),
        "rejected" => (
            MessageLevel::Warning,
            format!("The talent \"{}\" was rejected. ❌", profile_name()),
        ),
        "not_found" => (MessageLevel::Error, "Talent not found".to_string()),
        "bulk_approved" => (
            MessageLevel::Success,
            format!("{count} talent(s) approved successfully. ✅"),
        ),
        "bulk_rejected" => (MessageLevel::Warning, format!("{count} talent(s) rejected. ❌")),
        "none_selected" => (
            MessageLevel::Warning,
            "Select at least one talent to apply an action.".to_string(),
        ),
        _ => return None,
    };
    Some(AdminMessage { level, text })
}

fn changelist_redirect(query: &str) -> Response {
    let target = format!("{}?{}", path(RouteName::AdminProfileChangelist), query);
    Redirect::to(&target).into_response()
}

pub(crate) async fn approve_handler<P, C, F>(
    State(state): State<TalentsState<P, C, F>>,
    Extension(AdminActor(actor)): Extension<AdminActor>,
    Path(profile_id): Path<u64>,
) -> Response
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    let id = ProfileId(profile_id);
    match state.service.approve(id, &actor) {
        Ok(_) => changelist_redirect(&format!("notice=approved&profile={id}")),
        Err(err) if err.is_not_found() => changelist_redirect("notice=not_found"),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn reject_handler<P, C, F>(
    State(state): State<TalentsState<P, C, F>>,
    Extension(AdminActor(actor)): Extension<AdminActor>,
    Path(profile_id): Path<u64>,
) -> Response
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    let id = ProfileId(profile_id);
    match state.service.reject(id, &actor) {
        Ok(_) => changelist_redirect(&format!("notice=rejected&profile={id}")),
        Err(err) if err.is_not_found() => changelist_redirect("notice=not_found"),
        Err(err) => service_error_response(err),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    ApproveSelected,
    RejectSelected,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkActionRequest {
    pub action: BulkAction,
    #[serde(default)]
    pub ids: Vec<ProfileId>,
}

pub(crate) async fn bulk_action_handler<P, C, F>(
    State(state): State<TalentsState<P, C, F>>,
    Extension(AdminActor(actor)): Extension<AdminActor>,
    Json(request): Json<BulkActionRequest>,
) -> Response
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    if request.ids.is_empty() {
        return changelist_redirect("notice=none_selected");
    }

    let (result, notice) = match request.action {
        BulkAction::ApproveSelected => (
            state.service.bulk_approve(&request.ids, &actor),
            "bulk_approved",
        ),
        BulkAction::RejectSelected => (
            state.service.bulk_reject(&request.ids, &actor),
            "bulk_rejected",
        ),
    };

    match result {
        Ok(count) => changelist_redirect(&format!("notice={notice}&count={count}")),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn admin_change_handler<P, C, F>(
    State(state): State<TalentsState<P, C, F>>,
    Path(profile_id): Path<u64>,
) -> Response
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    match state.service.get_profile(ProfileId(profile_id)) {
        Ok(profile) => {
            let detail = AdminProfileDetail::new(&profile, profile_view(&state.service, &profile));
            (StatusCode::OK, Json(detail)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn admin_edit_handler<P, C, F>(
    State(state): State<TalentsState<P, C, F>>,
    Extension(AdminActor(actor)): Extension<AdminActor>,
    Path(profile_id): Path<u64>,
    Json(edit): Json<ProfileEdit>,
) -> Response
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    match state
        .service
        .edit_profile(ProfileId(profile_id), edit, &actor)
    {
        Ok(profile) => {
            let detail = AdminProfileDetail::new(&profile, profile_view(&state.service, &profile));
            (StatusCode::OK, Json(detail)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

#[derive(Debug, Serialize)]
pub struct AdminCollaborationList {
    pub query: String,
    pub page: PageInfo,
    pub results: Vec<CollaborationView>,
}

pub(crate) async fn admin_collaborations_handler<P, C, F>(
    State(state): State<TalentsState<P, C, F>>,
    Query(params): Query<AdminListParams>,
) -> Response
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    let query = SearchQuery::new(params.q.as_deref());
    match state
        .service
        .admin_collaborations(&query, params.page.unwrap_or(1))
    {
        Ok(page) => {
            let body = AdminCollaborationList {
                query: params.q.clone().unwrap_or_default(),
                page: PageInfo::from(&page),
                results: page.items.iter().map(CollaborationView::from).collect(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).expect("header"),
        );
        headers
    }

    #[test]
    fn secure_compare_matches_only_identical_tokens() {
        assert!(secure_compare("moderation-secret", "moderation-secret"));
        assert!(!secure_compare("moderation-secret", "moderation-secreT"));
        assert!(!secure_compare("moderation-secret", "moderation"));
        assert!(!secure_compare("", "moderation-secret"));
    }

    #[test]
    fn admin_gate_refuses_token_of_equal_length() {
        let gate = AdminGate::new(Some("moderation-secret".to_string()));

        assert_eq!(
            gate.authorize(&bearer("moderation-secreT")),
            Err(AdminDenied::InvalidToken)
        );
        assert_eq!(
            gate.authorize(&bearer("moderation-secret")),
            Ok("admin".to_string())
        );
    }

    #[test]
    fn admin_gate_without_token_is_disabled() {
        let gate = AdminGate::new(None);
        assert_eq!(
            gate.authorize(&bearer("anything")),
            Err(AdminDenied::Disabled)
        );
    }
}
