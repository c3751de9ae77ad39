use chrono::NaiveDate;
use shared_types::{AppError, LawyerProfile, MediaKind, VerificationStatus};
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const PROFILE_COLUMNS: &str = "p.id, p.user_id, p.full_name_en, p.full_name_bn, \
    p.license_issue_date, p.bar_council_number, p.bio_en, p.bio_bn, p.chamber_address, \
    p.consultation_fee_online, p.consultation_fee_offline, p.verification_status, \
    p.identity_document_url, p.profile_photo_url, p.verification_document_url, \
    p.created_at, p.updated_at";

/// A lawyer profile joined with its account email.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LawyerRow {
    #[sqlx(flatten)]
    pub profile: LawyerProfile,
    pub email: String,
}

/// Fields written by `upsert_profile`.
#[derive(Debug, Clone)]
pub struct LawyerProfileFields<'a> {
    pub user_id: Uuid,
    pub full_name_en: &'a str,
    pub full_name_bn: &'a str,
    pub license_issue_date: NaiveDate,
    pub bar_council_number: &'a str,
    pub bio_en: &'a str,
    pub bio_bn: &'a str,
    pub chamber_address: &'a str,
    pub consultation_fee_online: i64,
    pub consultation_fee_offline: i64,
    pub verification_status: VerificationStatus,
}

/// Insert or update the profile owned by `user_id`.
pub async fn upsert_profile(
    db: impl PgExecutor<'_>,
    fields: &LawyerProfileFields<'_>,
) -> Result<LawyerProfile, AppError> {
    sqlx::query_as::<_, LawyerProfile>(&format!(
        r#"
        INSERT INTO lawyer_profiles AS p
            (user_id, full_name_en, full_name_bn, license_issue_date, bar_council_number,
             bio_en, bio_bn, chamber_address, consultation_fee_online,
             consultation_fee_offline, verification_status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (user_id) DO UPDATE SET
            full_name_en = EXCLUDED.full_name_en,
            full_name_bn = EXCLUDED.full_name_bn,
            license_issue_date = EXCLUDED.license_issue_date,
            bar_council_number = EXCLUDED.bar_council_number,
            bio_en = EXCLUDED.bio_en,
            bio_bn = EXCLUDED.bio_bn,
            chamber_address = EXCLUDED.chamber_address,
            consultation_fee_online = EXCLUDED.consultation_fee_online,
            consultation_fee_offline = EXCLUDED.consultation_fee_offline,
            verification_status = EXCLUDED.verification_status,
            updated_at = NOW()
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(fields.user_id)
    .bind(fields.full_name_en)
    .bind(fields.full_name_bn)
    .bind(fields.license_issue_date)
    .bind(fields.bar_council_number)
    .bind(fields.bio_en)
    .bind(fields.bio_bn)
    .bind(fields.chamber_address)
    .bind(fields.consultation_fee_online)
    .bind(fields.consultation_fee_offline)
    .bind(fields.verification_status.as_str())
    .fetch_one(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Verified lawyers with active accounts, optionally narrowed to a
/// specialization slug. Returns one page plus the total match count.
pub async fn list_verified(
    pool: &Pool<Postgres>,
    specialization: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<LawyerRow>, i64), AppError> {
    let filter = r#"
        FROM lawyer_profiles p
        JOIN users u ON u.user_id = p.user_id
        WHERE p.verification_status = 'VERIFIED'
          AND u.is_active
          AND ($1::text IS NULL OR EXISTS (
                SELECT 1
                FROM lawyer_specialization_map m
                JOIN legal_specializations s ON s.id = m.specialization_id
                WHERE m.lawyer_id = p.id AND s.slug = $1 AND s.is_active
          ))
    "#;

    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) {filter}"))
        .bind(specialization)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    let rows = sqlx::query_as::<_, LawyerRow>(&format!(
        "SELECT {PROFILE_COLUMNS}, u.email {filter} \
         ORDER BY p.full_name_en ASC, p.id ASC LIMIT $2 OFFSET $3"
    ))
    .bind(specialization)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok((rows, total))
}

/// Profile by id, regardless of verification status.
pub async fn find_by_id(db: impl PgExecutor<'_>, id: Uuid) -> Result<Option<LawyerRow>, AppError> {
    sqlx::query_as::<_, LawyerRow>(&format!(
        "SELECT {PROFILE_COLUMNS}, u.email FROM lawyer_profiles p \
         JOIN users u ON u.user_id = p.user_id WHERE p.id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_user_id(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
) -> Result<Option<LawyerProfile>, AppError> {
    sqlx::query_as::<_, LawyerProfile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM lawyer_profiles p WHERE p.user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Set the verification status. Returns `None` when the profile is missing.
pub async fn update_verification(
    db: impl PgExecutor<'_>,
    id: Uuid,
    status: VerificationStatus,
) -> Result<Option<LawyerProfile>, AppError> {
    sqlx::query_as::<_, LawyerProfile>(&format!(
        r#"
        UPDATE lawyer_profiles AS p
        SET verification_status = $2, updated_at = NOW()
        WHERE p.id = $1
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Point one media column at `relative_path` and return the path it held
/// before. `None` when the user has no lawyer profile.
pub async fn set_media_path(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
    kind: MediaKind,
    relative_path: &str,
) -> Result<Option<Option<String>>, AppError> {
    // Column names come from a closed enum.
    let column = kind.column();
    sqlx::query_scalar::<_, Option<String>>(&format!(
        r#"
        WITH prev AS (
            SELECT id, {column} AS previous
            FROM lawyer_profiles
            WHERE user_id = $1
            FOR UPDATE
        )
        UPDATE lawyer_profiles p
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
