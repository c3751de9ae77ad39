use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, EvidenceDocument, EvidenceResponse, MediaConfig};

use crate::auth::extractors::AuthRequired;
use crate::media::{discard_on_error, save_multipart_file, FileUpload, MediaLinks};
use crate::repo::{self, evidence::NewEvidence};

use super::case::load_case;

fn evidence_response(doc: EvidenceDocument, links: &MediaLinks) -> EvidenceResponse {
    EvidenceResponse {
        id: doc.id.to_string(),
        case_id: doc.case_id.to_string(),
        uploaded_by: doc.uploaded_by.to_string(),
        url: links.url(Some(&doc.file_path)).unwrap_or_default(),
        original_filename: doc.original_filename,
        content_type: doc.content_type,
        size_bytes: doc.size_bytes,
        sha256: doc.encryption_hash,
        uploaded_at: doc.uploaded_at.to_rfc3339(),
    }
}

/// POST /api/cases/{id}/evidence
#[utoipa::path(
    post,
    path = "/api/cases/{id}/evidence",
    params(("id" = String, Path, description = "Case UUID")),
    request_body(content = FileUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Evidence stored", body = EvidenceResponse),
        (status = 403, description = "Read-only access", body = AppError),
        (status = 404, description = "Case not found", body = AppError),
        (status = 413, description = "File too large", body = AppError),
        (status = 422, description = "No file supplied", body = AppError)
    ),
    tag = "evidence",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, media, auth, links, multipart))]
pub async fn upload_evidence(
    State(pool): State<Pool<Postgres>>,
    State(media): State<MediaConfig>,
    auth: AuthRequired,
    links: MediaLinks,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<EvidenceResponse>), AppError> {
    let (case, access) = load_case(&pool, &auth.0, &id).await?;
    if !access.can_upload_evidence() {
        return Err(AppError::forbidden("Read-only access to this case"));
    }

    let subdir = format!("evidence/{}", case.case_id);
    let upload = save_multipart_file(&mut multipart, &media, &subdir).await?;

    let media_root = std::path::Path::new(&media.root);
    let stored_path = upload.stored.relative_path.clone();
    let insert = async {
        let size_bytes = i64::try_from(upload.stored.size_bytes)
            .map_err(|_| AppError::payload_too_large("File is too large"))?;
        repo::evidence::create(
            &pool,
            &NewEvidence {
                case_id: case.case_id,
                uploaded_by: auth.0.sub,
                file_path: &upload.stored.relative_path,
                original_filename: &upload.original_filename,
                content_type: &upload.content_type,
                size_bytes,
                sha256: &upload.stored.sha256,
            },
        )
        .await
    };
    let doc = discard_on_error(media_root, &stored_path, insert.await).await?;

    tracing::info!(
        case_id = %case.case_id,
        evidence_id = %doc.id,
        size_bytes = doc.size_bytes,
        "Evidence stored"
    );
    Ok((StatusCode::CREATED, Json(evidence_response(doc, &links))))
}

/// GET /api/cases/{id}/evidence
#[utoipa::path(
    get,
    path = "/api/cases/{id}/evidence",
    params(("id" = String, Path, description = "Case UUID")),
    responses(
        (status = 200, description = "Evidence for the case", body = Vec<EvidenceResponse>),
        (status = 404, description = "Case not found", body = AppError)
    ),
    tag = "evidence",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth, links))]
pub async fn list_evidence(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    links: MediaLinks,
    Path(id): Path<String>,
) -> Result<Json<Vec<EvidenceResponse>>, AppError> {
    let (case, _) = load_case(&pool, &auth.0, &id).await?;
    let docs = repo::evidence::list_for_case(&pool, case.case_id).await?;
    Ok(Json(docs.into_iter().map(|d| evidence_response(d, &links)).collect()))
}
