use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform role carried by every account.
///
/// - `Citizen`: opens cases and uploads evidence.
/// - `Lawyer`: listed in the directory, works assigned cases.
/// - `Admin`: full access (superset of all roles).
/// - `NgoSupport`: caseworker with read access to every case.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Citizen,
    Lawyer,
    Admin,
    NgoSupport,
}

impl UserRole {
    /// Every role, in the order the default auth groups are created.
    pub const ALL: [UserRole; 4] = [
        UserRole::Citizen,
        UserRole::Lawyer,
        UserRole::Admin,
        UserRole::NgoSupport,
    ];

    /// Parse a stored role. Unknown values default to Citizen.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "LAWYER" => UserRole::Lawyer,
            "ADMIN" => UserRole::Admin,
            "NGO_SUPPORT" => UserRole::NgoSupport,
            _ => UserRole::Citizen,
        }
    }

    /// Uppercase string for database / JWT storage. Doubles as the auth group name.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Citizen => "CITIZEN",
            UserRole::Lawyer => "LAWYER",
            UserRole::Admin => "ADMIN",
            UserRole::NgoSupport => "NGO_SUPPORT",
        }
    }

    /// Admin satisfies every role; every other role only satisfies itself.
    pub fn satisfies(&self, required: &UserRole) -> bool {
        matches!(self, UserRole::Admin) || self == required
    }

    /// Roles allowed to read every case on the platform.
    pub fn sees_all_cases(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::NgoSupport)
    }
}

/// Account row from the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub phone_number: String,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> UserRole {
        UserRole::from_str_or_default(&self.role)
    }
}

/// Named permission group. One exists per `UserRole`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct RoleGroup {
    pub id: i32,
    pub name: String,
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub phone_number: String,
    pub name: String,
    pub role: UserRole,
    pub is_verified: bool,
}

impl From<User> for AuthUser {
    fn from(u: User) -> Self {
        let role = u.role();
        Self {
            id: u.user_id,
            email: u.email,
            phone_number: u.phone_number,
            name: u.name,
            role,
            is_verified: u.is_verified,
        }
    }
}

/// Login / registration response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: AuthUser,
}
