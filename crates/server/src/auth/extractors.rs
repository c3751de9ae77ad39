use axum::{extract::FromRequestParts, http::request::Parts};
use shared_types::{AppError, UserRole};

use super::jwt::Claims;

/// Extractor that requires authentication. Returns 401 if no valid token.
pub struct AuthRequired(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AuthRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthRequired)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// Extractor for routes that behave differently for signed-in callers.
/// Never rejects.
pub struct MaybeAuth(pub Option<Claims>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuth(parts.extensions.get::<Claims>().cloned()))
    }
}

/// Role constants for `RoleRequired` (match `UserRole` variants).
pub const CITIZEN: u8 = 0;
pub const LAWYER: u8 = 1;
pub const ADMIN: u8 = 2;
pub const NGO_SUPPORT: u8 = 3;

/// Extractor that requires authentication AND a specific role.
/// Returns 401 if unauthenticated, 403 if the role does not satisfy the
/// required one. Admin satisfies every role.
pub struct RoleRequired<const ROLE: u8>(pub Claims);

pub type AdminRequired = RoleRequired<ADMIN>;

fn required_role(role: u8) -> UserRole {
    match role {
        LAWYER => UserRole::Lawyer,
        ADMIN => UserRole::Admin,
        NGO_SUPPORT => UserRole::NgoSupport,
        _ => UserRole::Citizen,
    }
}

impl<const ROLE: u8, S: Send + Sync> FromRequestParts<S> for RoleRequired<ROLE> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

        let required = required_role(ROLE);
        if !claims.role().satisfies(&required) {
            return Err(AppError::forbidden(format!("{} role required", required.as_str())));
        }

        Ok(RoleRequired(claims))
    }
}
