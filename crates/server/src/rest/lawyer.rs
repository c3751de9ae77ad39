use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use shared_types::{
    experience_years, normalize_pagination, AppError, LawyerListParams, LawyerProfile,
    LawyerResponse, PaginatedResponse, SpecializationResponse, UpdateVerificationRequest,
    UserRole, VerificationStatus,
};

use crate::auth::extractors::{AdminRequired, MaybeAuth};
use crate::error_convert::ValidateRequest;
use crate::media::MediaLinks;
use crate::repo::{self, lawyer::LawyerRow};

pub(crate) fn lawyer_response(
    profile: LawyerProfile,
    email: String,
    specializations: Vec<SpecializationResponse>,
    links: &MediaLinks,
    today: NaiveDate,
) -> LawyerResponse {
    LawyerResponse {
        id: profile.id.to_string(),
        user_id: profile.user_id.to_string(),
        email,
        experience_years: experience_years(profile.license_issue_date, today),
        verification_status: profile.verification(),
        profile_photo_url: links.url(profile.profile_photo_url.as_deref()),
        identity_document_url: links.url(profile.identity_document_url.as_deref()),
        verification_document_url: links.url(profile.verification_document_url.as_deref()),
        full_name_en: profile.full_name_en,
        full_name_bn: profile.full_name_bn,
        bar_council_number: profile.bar_council_number,
        license_issue_date: profile.license_issue_date,
        bio_en: profile.bio_en,
        bio_bn: profile.bio_bn,
        chamber_address: profile.chamber_address,
        consultation_fee_online: profile.consultation_fee_online,
        consultation_fee_offline: profile.consultation_fee_offline,
        specializations,
    }
}

/// Specializations for each of `lawyer_ids`, keyed by lawyer profile id.
pub(crate) async fn specializations_by_lawyer(
    pool: &Pool<Postgres>,
    lawyer_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<SpecializationResponse>>, AppError> {
    let mut grouped: HashMap<Uuid, Vec<SpecializationResponse>> = HashMap::new();
    for row in repo::specialization::list_for_lawyers(pool, lawyer_ids).await? {
        grouped
            .entry(row.lawyer_id)
            .or_default()
            .push(SpecializationResponse::from(row.specialization));
    }
    Ok(grouped)
}

async fn single_response(
    pool: &Pool<Postgres>,
    row: LawyerRow,
    links: &MediaLinks,
) -> Result<LawyerResponse, AppError> {
    let specs = specializations_by_lawyer(pool, &[row.profile.id])
        .await?
        .remove(&row.profile.id)
        .unwrap_or_default();
    Ok(lawyer_response(row.profile, row.email, specs, links, Utc::now().date_naive()))
}

/// GET /api/lawyers
#[utoipa::path(
    get,
    path = "/api/lawyers",
    params(LawyerListParams),
    responses(
        (status = 200, description = "Verified lawyers", body = PaginatedResponse<LawyerResponse>)
    ),
    tag = "lawyers"
)]
#[tracing::instrument(skip(pool, links))]
pub async fn list_lawyers(
    State(pool): State<Pool<Postgres>>,
    links: MediaLinks,
    Query(params): Query<LawyerListParams>,
) -> Result<Json<PaginatedResponse<LawyerResponse>>, AppError> {
    let (page, limit) = normalize_pagination(params.page, params.limit);
    let specialization = params
        .specialization
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let (rows, total) =
        repo::lawyer::list_verified(&pool, specialization, limit, (page - 1) * limit).await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.profile.id).collect();
    let mut specs = specializations_by_lawyer(&pool, &ids).await?;
    let today = Utc::now().date_naive();

    let data = rows
        .into_iter()
        .map(|row| {
            let lawyer_specs = specs.remove(&row.profile.id).unwrap_or_default();
            lawyer_response(row.profile, row.email, lawyer_specs, &links, today)
        })
        .collect();

    Ok(Json(PaginatedResponse::new(data, page, limit, total)))
}

/// GET /api/lawyers/{id}
///
/// Verified lawyers are public. Other profiles are visible only to their
/// owner and to admins.
#[utoipa::path(
    get,
    path = "/api/lawyers/{id}",
    params(("id" = String, Path, description = "Lawyer profile UUID")),
    responses(
        (status = 200, description = "Lawyer found", body = LawyerResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "lawyers"
)]
#[tracing::instrument(skip(pool, auth, links))]
pub async fn get_lawyer(
    State(pool): State<Pool<Postgres>>,
    auth: MaybeAuth,
    links: MediaLinks,
    Path(id): Path<String>,
) -> Result<Json<LawyerResponse>, AppError> {
    let uuid = Uuid::parse_str(&id).map_err(|_| AppError::bad_request("Invalid UUID format"))?;
    let not_found = || AppError::not_found(format!("Lawyer {id} not found"));

    let row = repo::lawyer::find_by_id(&pool, uuid).await?.ok_or_else(not_found)?;

    let visible = row.profile.verification() == VerificationStatus::Verified
        || auth.0.as_ref().is_some_and(|claims| {
            claims.sub == row.profile.user_id || claims.role() == UserRole::Admin
        });
    if !visible {
        return Err(not_found());
    }

    Ok(Json(single_response(&pool, row, &links).await?))
}

/// PATCH /api/admin/lawyers/{id}/verification
#[utoipa::path(
    patch,
    path = "/api/admin/lawyers/{id}/verification",
    request_body = UpdateVerificationRequest,
    params(("id" = String, Path, description = "Lawyer profile UUID")),
    responses(
        (status = 200, description = "Verification updated", body = LawyerResponse),
        (status = 403, description = "Admin role required", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, admin, links, body))]
pub async fn update_verification(
    State(pool): State<Pool<Postgres>>,
    admin: AdminRequired,
    links: MediaLinks,
    Path(id): Path<String>,
    Json(body): Json<UpdateVerificationRequest>,
) -> Result<Json<LawyerResponse>, AppError> {
    body.validate_request()?;
    let uuid = Uuid::parse_str(&id).map_err(|_| AppError::bad_request("Invalid UUID format"))?;

    repo::lawyer::update_verification(&pool, uuid, body.verification_status)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Lawyer {id} not found")))?;

    tracing::info!(
        lawyer_id = %uuid,
        admin_id = %admin.0.sub,
        status = body.verification_status.as_str(),
        note = body.note.as_deref().unwrap_or(""),
        "Lawyer verification updated"
    );

    let row = repo::lawyer::find_by_id(&pool, uuid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Lawyer {id} not found")))?;
    Ok(Json(single_response(&pool, row, &links).await?))
}
