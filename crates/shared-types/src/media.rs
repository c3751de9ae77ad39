use serde::{Deserialize, Serialize};

/// Which profile document an upload replaces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    ProfilePhoto,
    IdentityDocument,
    /// Bar council certificate. Lawyers only.
    VerificationDocument,
}

impl MediaKind {
    /// URL path segment, also used as the storage subdirectory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProfilePhoto => "profile-photo",
            Self::IdentityDocument => "identity-document",
            Self::VerificationDocument => "verification-document",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "profile-photo" => Some(Self::ProfilePhoto),
            "identity-document" => Some(Self::IdentityDocument),
            "verification-document" => Some(Self::VerificationDocument),
            _ => None,
        }
    }

    /// Profile column the stored relative path is written to.
    pub fn column(&self) -> &'static str {
        match self {
            Self::ProfilePhoto => "profile_photo_url",
            Self::IdentityDocument => "identity_document_url",
            Self::VerificationDocument => "verification_document_url",
        }
    }
}

/// Result of a profile media upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MediaUploadResponse {
    pub kind: MediaKind,
    /// Path relative to the media root, as stored in the profile.
    pub path: String,
    pub url: String,
    pub size_bytes: u64,
}
