use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row from `citizen_profiles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct CitizenProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub address: Option<String>,
    pub identity_document_url: Option<String>,
    pub profile_photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API view of a citizen profile. Media fields hold public URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CitizenProfileResponse {
    pub id: String,
    pub user_id: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_document_url: Option<String>,
}

/// The caller's own profile, shaped by role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "role", content = "profile", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileResponse {
    Citizen(CitizenProfileResponse),
    Lawyer(crate::lawyer::LawyerResponse),
}
