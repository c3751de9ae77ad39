use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

// ── Specializations ──────────────────────────────────────────────────

/// A practice area lawyers can be listed under.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct LegalSpecialization {
    pub id: i32,
    pub slug: String,
    pub name_en: String,
    pub name_bn: String,
    pub description_en: String,
    pub description_bn: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SpecializationResponse {
    pub slug: String,
    pub name_en: String,
    pub name_bn: String,
    pub description_en: String,
    pub description_bn: String,
}

impl From<LegalSpecialization> for SpecializationResponse {
    fn from(s: LegalSpecialization) -> Self {
        Self {
            slug: s.slug,
            name_en: s.name_en,
            name_bn: s.name_bn,
            description_en: s.description_en,
            description_bn: s.description_bn,
        }
    }
}

// ── Verification ─────────────────────────────────────────────────────

/// Lawyer licence verification state, matching the DB CHECK constraint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "VERIFIED" => Some(Self::Verified),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

// ── Profiles ─────────────────────────────────────────────────────────

/// Row from `lawyer_profiles`. Fees are whole taka.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct LawyerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name_en: String,
    pub full_name_bn: String,
    pub license_issue_date: NaiveDate,
    pub bar_council_number: String,
    pub bio_en: String,
    pub bio_bn: String,
    pub chamber_address: String,
    pub consultation_fee_online: i64,
    pub consultation_fee_offline: i64,
    pub verification_status: String,
    pub identity_document_url: Option<String>,
    pub profile_photo_url: Option<String>,
    pub verification_document_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LawyerProfile {
    pub fn verification(&self) -> VerificationStatus {
        VerificationStatus::from_str_opt(&self.verification_status).unwrap_or_default()
    }
}

/// Whole years of practice between licence issue and `today`.
pub fn experience_years(license_issue_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - license_issue_date.year();
    if (today.month(), today.day()) < (license_issue_date.month(), license_issue_date.day()) {
        years -= 1;
    }
    years.max(0)
}

/// Directory entry for a lawyer. Media fields hold public URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LawyerResponse {
    pub id: String,
    pub user_id: String,
    pub email: String,
    pub full_name_en: String,
    pub full_name_bn: String,
    pub bar_council_number: String,
    pub license_issue_date: NaiveDate,
    pub experience_years: i32,
    pub bio_en: String,
    pub bio_bn: String,
    pub chamber_address: String,
    pub consultation_fee_online: i64,
    pub consultation_fee_offline: i64,
    pub verification_status: VerificationStatus,
    pub specializations: Vec<SpecializationResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_document_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_document_url: Option<String>,
}

/// Query parameters for the lawyer directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct LawyerListParams {
    /// Only lawyers mapped to this specialization slug.
    pub specialization: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Admin decision on a lawyer's licence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct UpdateVerificationRequest {
    pub verification_status: VerificationStatus,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(length(max = 1000, message = "Note must be at most 1000 characters"))
    )]
    pub note: Option<String>,
}
