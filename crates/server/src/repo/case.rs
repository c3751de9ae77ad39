use shared_types::{AppError, Case, CaseStatus, UpdateCaseMetadataRequest};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const CASE_COLUMNS: &str = "case_id, citizen_user_id, lawyer_id, title, description, status, \
    case_number, court_name, filing_date, next_hearing_at, presiding_judge, relevant_acts, \
    created_at, updated_at";

/// Open a case for a citizen. A chosen lawyer moves it straight to ASSIGNED.
pub async fn create(
    db: impl PgExecutor<'_>,
    citizen_user_id: Uuid,
    title: &str,
    description: &str,
    lawyer_id: Option<Uuid>,
) -> Result<Case, AppError> {
    let status = if lawyer_id.is_some() {
        CaseStatus::Assigned
    } else {
        CaseStatus::Open
    };

    sqlx::query_as::<_, Case>(&format!(
        r#"
        INSERT INTO cases (citizen_user_id, lawyer_id, title, description, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {CASE_COLUMNS}
        "#
    ))
    .bind(citizen_user_id)
    .bind(lawyer_id)
    .bind(title)
    .bind(description)
    .bind(status.as_str())
    .fetch_one(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(db: impl PgExecutor<'_>, case_id: Uuid) -> Result<Option<Case>, AppError> {
    sqlx::query_as::<_, Case>(&format!("SELECT {CASE_COLUMNS} FROM cases WHERE case_id = $1"))
        .bind(case_id)
        .fetch_optional(db)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Whose cases a listing covers.
#[derive(Debug, Clone, Copy)]
pub enum CaseScope {
    All,
    Citizen(Uuid),
    /// Cases assigned to this lawyer profile.
    Lawyer(Uuid),
}

/// Newest first.
pub async fn list(db: impl PgExecutor<'_>, scope: CaseScope) -> Result<Vec<Case>, AppError> {
    let (clause, id) = match scope {
        CaseScope::All => ("TRUE", None),
        CaseScope::Citizen(id) => ("citizen_user_id = $1", Some(id)),
        CaseScope::Lawyer(id) => ("lawyer_id = $1", Some(id)),
    };
    let sql = format!("SELECT {CASE_COLUMNS} FROM cases WHERE {clause} ORDER BY created_at DESC");

    let mut query = sqlx::query_as::<_, Case>(&sql);
    if let Some(id) = id {
        query = query.bind(id);
    }
    query
        .fetch_all(db)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Write the court metadata fields present in `req`; absent ones are kept.
pub async fn update_metadata(
    db: impl PgExecutor<'_>,
    case_id: Uuid,
    req: &UpdateCaseMetadataRequest,
) -> Result<Option<Case>, AppError> {
    sqlx::query_as::<_, Case>(&format!(
        r#"
        UPDATE cases SET
            case_number     = COALESCE($2, case_number),
            court_name      = COALESCE($3, court_name),
            filing_date     = COALESCE($4, filing_date),
            next_hearing_at = COALESCE($5, next_hearing_at),
            presiding_judge = COALESCE($6, presiding_judge),
            relevant_acts   = COALESCE($7, relevant_acts),
            status          = COALESCE($8, status),
            updated_at      = NOW()
        WHERE case_id = $1
        RETURNING {CASE_COLUMNS}
        "#
    ))
    .bind(case_id)
    .bind(req.case_number.as_deref())
    .bind(req.court_name.as_deref())
    .bind(req.filing_date)
    .bind(req.next_hearing_at)
    .bind(req.presiding_judge.as_deref())
    .bind(req.relevant_acts.as_deref())
    .bind(req.status.map(|s| s.as_str()))
    .fetch_optional(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
