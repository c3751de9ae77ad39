use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::Utc;
use sqlx::{Pool, Postgres};

use shared_types::{
    AppError, CitizenProfile, CitizenProfileResponse, MediaConfig, MediaKind,
    MediaUploadResponse, ProfileResponse, UserRole,
};
use uuid::Uuid;

use crate::auth::extractors::AuthRequired;
use crate::media::{discard_file, discard_on_error, save_multipart_file, FileUpload, MediaLinks};
use crate::repo;

use super::lawyer::{lawyer_response, specializations_by_lawyer};

fn citizen_response(profile: CitizenProfile, links: &MediaLinks) -> CitizenProfileResponse {
    CitizenProfileResponse {
        id: profile.id.to_string(),
        user_id: profile.user_id.to_string(),
        profile_photo_url: links.url(profile.profile_photo_url.as_deref()),
        identity_document_url: links.url(profile.identity_document_url.as_deref()),
        full_name: profile.full_name,
        address: profile.address,
    }
}

/// Storage subdirectory for a profile upload, e.g. `profiles/lawyer/profile-photo`.
pub fn profile_media_subdir(role: UserRole, kind: MediaKind) -> String {
    format!(
        "profiles/{}/{}",
        role.as_str().to_ascii_lowercase(),
        kind.as_str()
    )
}

/// GET /api/profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Caller's profile", body = ProfileResponse),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 404, description = "No profile for this account", body = AppError)
    ),
    tag = "profile",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth, links))]
pub async fn get_profile(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    links: MediaLinks,
) -> Result<Json<ProfileResponse>, AppError> {
    let user_id = auth.0.sub;
    match auth.0.role() {
        UserRole::Citizen => {
            let profile = repo::citizen::find_by_user_id(&pool, user_id)
                .await?
                .ok_or_else(|| AppError::not_found("Citizen profile not found"))?;
            Ok(Json(ProfileResponse::Citizen(citizen_response(profile, &links))))
        }
        UserRole::Lawyer => {
            let profile = repo::lawyer::find_by_user_id(&pool, user_id)
                .await?
                .ok_or_else(|| AppError::not_found("Lawyer profile not found"))?;
            let specs = specializations_by_lawyer(&pool, &[profile.id])
                .await?
                .remove(&profile.id)
                .unwrap_or_default();
            Ok(Json(ProfileResponse::Lawyer(lawyer_response(
                profile,
                auth.0.email.clone(),
                specs,
                &links,
                Utc::now().date_naive(),
            ))))
        }
        UserRole::Admin | UserRole::NgoSupport => {
            Err(AppError::not_found("This account has no profile"))
        }
    }
}

/// Confirm the caller has a profile that accepts `kind`.
async fn ensure_profile_accepts(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    role: UserRole,
    kind: MediaKind,
) -> Result<(), AppError> {
    match role {
        UserRole::Lawyer => {
            repo::lawyer::find_by_user_id(pool, user_id)
                .await?
                .ok_or_else(|| AppError::not_found("Lawyer profile not found"))?;
        }
        UserRole::Citizen => {
            if kind == MediaKind::VerificationDocument {
                return Err(AppError::bad_request(
                    "Verification documents are only accepted from lawyers",
                ));
            }
            repo::citizen::find_by_user_id(pool, user_id)
                .await?
                .ok_or_else(|| AppError::not_found("Citizen profile not found"))?;
        }
        UserRole::Admin | UserRole::NgoSupport => {
            return Err(AppError::forbidden("Only citizens and lawyers have profile media"));
        }
    }
    Ok(())
}

/// POST /api/profile/media/{kind}
///
/// Multipart body with a `file` field. Replaces the stored path for `kind`
/// on the caller's own profile.
#[utoipa::path(
    post,
    path = "/api/profile/media/{kind}",
    params(("kind" = String, Path, description = "profile-photo, identity-document or verification-document")),
    request_body(content = FileUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = MediaUploadResponse),
        (status = 400, description = "Unknown kind or not allowed for this role", body = AppError),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 413, description = "File too large", body = AppError),
        (status = 422, description = "No file supplied", body = AppError)
    ),
    tag = "profile",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, media, auth, links, multipart))]
pub async fn upload_profile_media(
    State(pool): State<Pool<Postgres>>,
    State(media): State<MediaConfig>,
    auth: AuthRequired,
    links: MediaLinks,
    Path(kind): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<MediaUploadResponse>, AppError> {
    let kind = MediaKind::from_str_opt(&kind)
        .ok_or_else(|| AppError::bad_request(format!("Unknown media kind: {kind}")))?;
    let user_id = auth.0.sub;
    let role = auth.0.role();

    ensure_profile_accepts(&pool, user_id, role, kind).await?;

    let upload = save_multipart_file(&mut multipart, &media, &profile_media_subdir(role, kind)).await?;
    let path = upload.stored.relative_path;
    let media_root = std::path::Path::new(&media.root);

    let swapped = match role {
        UserRole::Lawyer => repo::lawyer::set_media_path(&pool, user_id, kind, &path).await,
        _ => repo::citizen::set_media_path(&pool, user_id, kind, &path).await,
    }
    .and_then(|previous| previous.ok_or_else(|| AppError::not_found("Profile not found")));
    let previous = discard_on_error(media_root, &path, swapped).await?;

    if let Some(old) = previous.filter(|old| !old.is_empty() && *old != path) {
        discard_file(media_root, &old).await;
    }

    tracing::info!(%user_id, kind = kind.as_str(), %path, "Profile media updated");

    Ok(Json(MediaUploadResponse {
        kind,
        url: links.url(Some(&path)).unwrap_or_default(),
        size_bytes: upload.stored.size_bytes,
        path,
    }))
}
