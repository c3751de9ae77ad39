use serde::{Deserialize, Serialize};

#[cfg(feature = "validation")]
use validator::Validate;

/// Self-service citizen sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct RegisterCitizenRequest {
    #[cfg_attr(feature = "validation", validate(email(message = "Invalid email format")))]
    pub email: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 6, max = 20, message = "Phone number must be 6-20 characters"))
    )]
    pub phone_number: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 255, message = "Name is required"))
    )]
    pub name: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 8, message = "Password must be at least 8 characters"))
    )]
    pub password: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Email + password login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct LoginRequest {
    #[cfg_attr(feature = "validation", validate(email(message = "Invalid email format")))]
    pub email: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Password is required"))
    )]
    pub password: String,
}
