use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

/// Lifecycle of a legal-aid case, matching the DB CHECK constraint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    #[default]
    Open,
    Assigned,
    InProgress,
    Closed,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Assigned => "ASSIGNED",
            Self::InProgress => "IN_PROGRESS",
            Self::Closed => "CLOSED",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(Self::Open),
            "ASSIGNED" => Some(Self::Assigned),
            "IN_PROGRESS" => Some(Self::InProgress),
            "CLOSED" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// Row from `cases`, including the court metadata columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Case {
    pub case_id: Uuid,
    pub citizen_user_id: Uuid,
    pub lawyer_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub status: String,
    pub case_number: Option<String>,
    pub court_name: Option<String>,
    pub filing_date: Option<NaiveDate>,
    pub next_hearing_at: Option<DateTime<Utc>>,
    pub presiding_judge: Option<String>,
    pub relevant_acts: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseResponse {
    pub id: String,
    pub citizen_user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lawyer_id: Option<String>,
    pub title: String,
    pub description: String,
    pub status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub court_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filing_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_hearing_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presiding_judge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevant_acts: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Case> for CaseResponse {
    fn from(c: Case) -> Self {
        Self {
            id: c.case_id.to_string(),
            citizen_user_id: c.citizen_user_id.to_string(),
            lawyer_id: c.lawyer_id.map(|id| id.to_string()),
            title: c.title,
            description: c.description,
            status: CaseStatus::from_str_opt(&c.status).unwrap_or_default(),
            case_number: c.case_number,
            court_name: c.court_name,
            filing_date: c.filing_date,
            next_hearing_at: c.next_hearing_at.map(|t| t.to_rfc3339()),
            presiding_judge: c.presiding_judge,
            relevant_acts: c.relevant_acts,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

/// Citizen opening a new case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct CreateCaseRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))
    )]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Lawyer profile the citizen wants to retain, if already chosen.
    #[serde(default)]
    pub lawyer_id: Option<Uuid>,
}

/// Court metadata recorded by the assigned lawyer or an admin.
///
/// Only fields that are present are written; absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct UpdateCaseMetadataRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(max = 100, message = "Case number must be at most 100 characters"))
    )]
    pub case_number: Option<String>,
    #[cfg_attr(
        feature = "validation",
        validate(length(max = 255, message = "Court name must be at most 255 characters"))
    )]
    pub court_name: Option<String>,
    pub filing_date: Option<NaiveDate>,
    pub next_hearing_at: Option<DateTime<Utc>>,
    #[cfg_attr(
        feature = "validation",
        validate(length(max = 255, message = "Presiding judge must be at most 255 characters"))
    )]
    pub presiding_judge: Option<String>,
    pub relevant_acts: Option<String>,
    pub status: Option<CaseStatus>,
}

// ── Evidence ─────────────────────────────────────────────────────────

/// Row from `evidence_documents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct EvidenceDocument {
    pub id: Uuid,
    pub case_id: Uuid,
    pub uploaded_by: Uuid,
    pub file_path: String,
    pub original_filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    /// Hex SHA-256 of the stored bytes.
    pub encryption_hash: String,
    pub encryption_key_id: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EvidenceResponse {
    pub id: String,
    pub case_id: String,
    pub uploaded_by: String,
    pub original_filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub sha256: String,
    pub url: String,
    pub uploaded_at: String,
}
