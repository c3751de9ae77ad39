use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use shared_types::{
    AppError, Case, CaseResponse, CreateCaseRequest, UpdateCaseMetadataRequest, UserRole,
    VerificationStatus,
};

use crate::auth::extractors::{AuthRequired, RoleRequired, CITIZEN};
use crate::auth::jwt::Claims;
use crate::error_convert::ValidateRequest;
use crate::repo::{self, case::CaseScope};

/// How the caller relates to a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseAccess {
    /// The citizen who opened it.
    Owner,
    /// The lawyer it is assigned to.
    AssignedLawyer,
    Admin,
    /// Read-only caseworker access.
    Support,
}

impl CaseAccess {
    /// May change court metadata.
    pub fn can_edit_metadata(self) -> bool {
        matches!(self, CaseAccess::AssignedLawyer | CaseAccess::Admin)
    }

    /// May attach evidence.
    pub fn can_upload_evidence(self) -> bool {
        !matches!(self, CaseAccess::Support)
    }
}

/// Decide the caller's access. `lawyer_profile_id` is the caller's own
/// lawyer profile, if any.
pub fn case_access(
    case: &Case,
    user_id: Uuid,
    role: UserRole,
    lawyer_profile_id: Option<Uuid>,
) -> Option<CaseAccess> {
    match role {
        UserRole::Admin => Some(CaseAccess::Admin),
        UserRole::NgoSupport => Some(CaseAccess::Support),
        UserRole::Citizen if case.citizen_user_id == user_id => Some(CaseAccess::Owner),
        UserRole::Lawyer if lawyer_profile_id.is_some() && case.lawyer_id == lawyer_profile_id => {
            Some(CaseAccess::AssignedLawyer)
        }
        _ => None,
    }
}

/// Load a case the caller may see. Invisible cases report 404.
pub(crate) async fn load_case(
    pool: &Pool<Postgres>,
    claims: &Claims,
    id: &str,
) -> Result<(Case, CaseAccess), AppError> {
    let case_id = Uuid::parse_str(id).map_err(|_| AppError::bad_request("Invalid UUID format"))?;
    let not_found = || AppError::not_found(format!("Case {id} not found"));

    let case = repo::case::find_by_id(pool, case_id).await?.ok_or_else(not_found)?;

    let role = claims.role();
    let lawyer_profile_id = if role == UserRole::Lawyer {
        repo::lawyer::find_by_user_id(pool, claims.sub).await?.map(|p| p.id)
    } else {
        None
    };

    let access = case_access(&case, claims.sub, role, lawyer_profile_id).ok_or_else(not_found)?;
    Ok((case, access))
}

/// POST /api/cases
#[utoipa::path(
    post,
    path = "/api/cases",
    request_body = CreateCaseRequest,
    responses(
        (status = 201, description = "Case opened", body = CaseResponse),
        (status = 400, description = "Unknown or unverified lawyer", body = AppError),
        (status = 403, description = "Citizen role required", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "cases",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth, body))]
pub async fn create_case(
    State(pool): State<Pool<Postgres>>,
    auth: RoleRequired<CITIZEN>,
    Json(body): Json<CreateCaseRequest>,
) -> Result<(StatusCode, Json<CaseResponse>), AppError> {
    body.validate_request()?;

    if let Some(lawyer_id) = body.lawyer_id {
        let verified = repo::lawyer::find_by_id(&pool, lawyer_id)
            .await?
            .is_some_and(|row| row.profile.verification() == VerificationStatus::Verified);
        if !verified {
            return Err(AppError::bad_request(format!(
                "Lawyer {lawyer_id} is not available"
            )));
        }
    }

    let case = repo::case::create(
        &pool,
        auth.0.sub,
        body.title.trim(),
        &body.description,
        body.lawyer_id,
    )
    .await?;

    tracing::info!(case_id = %case.case_id, citizen = %auth.0.sub, "Case opened");
    Ok((StatusCode::CREATED, Json(CaseResponse::from(case))))
}

/// GET /api/cases
#[utoipa::path(
    get,
    path = "/api/cases",
    responses(
        (status = 200, description = "Cases visible to the caller", body = Vec<CaseResponse>),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "cases",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn list_cases(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<Vec<CaseResponse>>, AppError> {
    let role = auth.0.role();
    let scope = if role.sees_all_cases() {
        CaseScope::All
    } else if role == UserRole::Lawyer {
        match repo::lawyer::find_by_user_id(&pool, auth.0.sub).await? {
            Some(profile) => CaseScope::Lawyer(profile.id),
            None => return Ok(Json(Vec::new())),
        }
    } else {
        CaseScope::Citizen(auth.0.sub)
    };

    let cases = repo::case::list(&pool, scope).await?;
    Ok(Json(cases.into_iter().map(CaseResponse::from).collect()))
}

/// GET /api/cases/{id}
#[utoipa::path(
    get,
    path = "/api/cases/{id}",
    params(("id" = String, Path, description = "Case UUID")),
    responses(
        (status = 200, description = "Case found", body = CaseResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "cases",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn get_case(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<CaseResponse>, AppError> {
    let (case, _) = load_case(&pool, &auth.0, &id).await?;
    Ok(Json(CaseResponse::from(case)))
}

/// PATCH /api/cases/{id}/metadata
#[utoipa::path(
    patch,
    path = "/api/cases/{id}/metadata",
    request_body = UpdateCaseMetadataRequest,
    params(("id" = String, Path, description = "Case UUID")),
    responses(
        (status = 200, description = "Metadata updated", body = CaseResponse),
        (status = 403, description = "Only the assigned lawyer or an admin", body = AppError),
        (status = 404, description = "Not found", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "cases",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth, body))]
pub async fn update_case_metadata(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Path(id): Path<String>,
    Json(body): Json<UpdateCaseMetadataRequest>,
) -> Result<Json<CaseResponse>, AppError> {
    body.validate_request()?;

    let (case, access) = load_case(&pool, &auth.0, &id).await?;
    if !access.can_edit_metadata() {
        return Err(AppError::forbidden(
            "Only the assigned lawyer or an admin can update case metadata",
        ));
    }

    let updated = repo::case::update_metadata(&pool, case.case_id, &body)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Case {id} not found")))?;

    tracing::info!(case_id = %updated.case_id, editor = %auth.0.sub, "Case metadata updated");
    Ok(Json(CaseResponse::from(updated)))
}
