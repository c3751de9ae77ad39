use shared_types::{AppError, LegalSpecialization};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const SPECIALIZATION_COLUMNS: &str =
    "id, slug, name_en, name_bn, description_en, description_bn, is_active, created_at";

/// Fields written by `upsert`.
#[derive(Debug, Clone)]
pub struct SpecializationFields<'a> {
    pub slug: &'a str,
    pub name_en: &'a str,
    pub name_bn: &'a str,
    pub description_en: &'a str,
    pub description_bn: &'a str,
    pub is_active: bool,
}

/// Insert or update the specialization identified by `slug`.
pub async fn upsert(
    db: impl PgExecutor<'_>,
    fields: &SpecializationFields<'_>,
) -> Result<LegalSpecialization, AppError> {
    sqlx::query_as::<_, LegalSpecialization>(&format!(
        r#"
        INSERT INTO legal_specializations
            (slug, name_en, name_bn, description_en, description_bn, is_active)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (slug) DO UPDATE SET
            name_en = EXCLUDED.name_en,
            name_bn = EXCLUDED.name_bn,
            description_en = EXCLUDED.description_en,
            description_bn = EXCLUDED.description_bn,
            is_active = EXCLUDED.is_active
        RETURNING {SPECIALIZATION_COLUMNS}
        "#
    ))
    .bind(fields.slug)
    .bind(fields.name_en)
    .bind(fields.name_bn)
    .bind(fields.description_en)
    .bind(fields.description_bn)
    .bind(fields.is_active)
    .fetch_one(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Active specializations, alphabetical by English name.
pub async fn list_active(db: impl PgExecutor<'_>) -> Result<Vec<LegalSpecialization>, AppError> {
    sqlx::query_as::<_, LegalSpecialization>(&format!(
        "SELECT {SPECIALIZATION_COLUMNS} FROM legal_specializations \
         WHERE is_active ORDER BY name_en ASC"
    ))
    .fetch_all(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// A specialization tagged with the lawyer it is mapped to.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LawyerSpecialization {
    pub lawyer_id: Uuid,
    #[sqlx(flatten)]
    pub specialization: LegalSpecialization,
}

/// Active specializations mapped to any of `lawyer_ids`.
pub async fn list_for_lawyers(
    db: impl PgExecutor<'_>,
    lawyer_ids: &[Uuid],
) -> Result<Vec<LawyerSpecialization>, AppError> {
    sqlx::query_as::<_, LawyerSpecialization>(
        r#"
        SELECT m.lawyer_id,
               s.id, s.slug, s.name_en, s.name_bn, s.description_en,
               s.description_bn, s.is_active, s.created_at
        FROM lawyer_specialization_map m
        JOIN legal_specializations s ON s.id = m.specialization_id
        WHERE m.lawyer_id = ANY($1) AND s.is_active
        ORDER BY s.name_en ASC
        "#,
    )
    .bind(lawyer_ids)
    .fetch_all(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Drop every specialization mapping for a lawyer.
pub async fn clear_for_lawyer(db: impl PgExecutor<'_>, lawyer_id: Uuid) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM lawyer_specialization_map WHERE lawyer_id = $1")
        .bind(lawyer_id)
        .execute(db)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected())
}

/// Map a lawyer to a specialization. No-op if already mapped.
pub async fn map_to_lawyer(
    db: impl PgExecutor<'_>,
    lawyer_id: Uuid,
    specialization_id: i32,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO lawyer_specialization_map (lawyer_id, specialization_id)
        VALUES ($1, $2)
        ON CONFLICT (lawyer_id, specialization_id) DO NOTHING
        "#,
    )
    .bind(lawyer_id)
    .bind(specialization_id)
    .execute(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(())
}
