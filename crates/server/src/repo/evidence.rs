use shared_types::{AppError, EvidenceDocument};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const EVIDENCE_COLUMNS: &str = "id, case_id, uploaded_by, file_path, original_filename, \
    content_type, size_bytes, encryption_hash, encryption_key_id, uploaded_at";

/// Files are stored as plain bytes on the media volume, so no key id.
pub const PLAINTEXT_KEY_ID: &str = "";

#[derive(Debug, Clone)]
pub struct NewEvidence<'a> {
    pub case_id: Uuid,
    pub uploaded_by: Uuid,
    pub file_path: &'a str,
    pub original_filename: &'a str,
    pub content_type: &'a str,
    pub size_bytes: i64,
    pub sha256: &'a str,
}

pub async fn create(
    db: impl PgExecutor<'_>,
    new: &NewEvidence<'_>,
) -> Result<EvidenceDocument, AppError> {
    sqlx::query_as::<_, EvidenceDocument>(&format!(
        r#"
        INSERT INTO evidence_documents
            (case_id, uploaded_by, file_path, original_filename, content_type,
             size_bytes, encryption_hash, encryption_key_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {EVIDENCE_COLUMNS}
        "#
    ))
    .bind(new.case_id)
    .bind(new.uploaded_by)
    .bind(new.file_path)
    .bind(new.original_filename)
    .bind(new.content_type)
    .bind(new.size_bytes)
    .bind(new.sha256)
    .bind(PLAINTEXT_KEY_ID)
    .fetch_one(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Oldest first.
pub async fn list_for_case(
    db: impl PgExecutor<'_>,
    case_id: Uuid,
) -> Result<Vec<EvidenceDocument>, AppError> {
    sqlx::query_as::<_, EvidenceDocument>(&format!(
        "SELECT {EVIDENCE_COLUMNS} FROM evidence_documents WHERE case_id = $1 \
         ORDER BY uploaded_at ASC"
    ))
    .bind(case_id)
    .fetch_all(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
