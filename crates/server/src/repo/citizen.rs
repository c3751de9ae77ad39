use shared_types::{AppError, CitizenProfile, MediaKind};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const CITIZEN_COLUMNS: &str = "id, user_id, full_name, address, identity_document_url, \
    profile_photo_url, created_at, updated_at";

pub async fn create(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
    full_name: &str,
    address: Option<&str>,
) -> Result<CitizenProfile, AppError> {
    sqlx::query_as::<_, CitizenProfile>(&format!(
        r#"
        INSERT INTO citizen_profiles (user_id, full_name, address)
        VALUES ($1, $2, $3)
        RETURNING {CITIZEN_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(full_name)
    .bind(address)
    .fetch_one(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_user_id(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
) -> Result<Option<CitizenProfile>, AppError> {
    sqlx::query_as::<_, CitizenProfile>(&format!(
        "SELECT {CITIZEN_COLUMNS} FROM citizen_profiles WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Point one media column at `relative_path` and return the path it held
/// before. `None` when the user has no citizen profile. Citizens have no
/// verification document column, so that kind is rejected.
pub async fn set_media_path(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
    kind: MediaKind,
    relative_path: &str,
) -> Result<Option<Option<String>>, AppError> {
    if kind == MediaKind::VerificationDocument {
        return Err(AppError::bad_request(
            "Verification documents are only accepted from lawyers",
        ));
    }
    // Column names come from a closed enum.
    let column = kind.column();
    sqlx::query_scalar::<_, Option<String>>(&format!(
        r#"
        WITH prev AS (
            SELECT id, {column} AS previous
            FROM citizen_profiles
            WHERE user_id = $1
            FOR UPDATE
        )
        UPDATE citizen_profiles p
        SET {column} = $2, updated_at = NOW()
        FROM prev
        WHERE p.id = prev.id
        RETURNING prev.previous
        "#
    ))
    .bind(user_id)
    .bind(relative_path)
    .fetch_optional(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
