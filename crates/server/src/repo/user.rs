use shared_types::{AppError, User, UserRole};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const USER_COLUMNS: &str = "user_id, email, phone_number, name, password_hash, role, \
    is_active, is_verified, is_staff, is_superuser, created_at, updated_at";

/// Fields for a new account. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub phone_number: String,
    pub name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub is_verified: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Emails compare case-insensitively; store them lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn create(db: impl PgExecutor<'_>, new: &NewUser) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users
            (email, phone_number, name, password_hash, role,
             is_active, is_verified, is_staff, is_superuser)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(normalize_email(&new.email))
    .bind(&new.phone_number)
    .bind(&new.name)
    .bind(&new.password_hash)
    .bind(new.role.as_str())
    .bind(new.is_active)
    .bind(new.is_verified)
    .bind(new.is_staff)
    .bind(new.is_superuser)
    .fetch_one(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Get-or-create keyed by email, then force role, phone and the
/// active/verified flags onto the row. Name and password are only written
/// when the row is new.
pub async fn upsert_by_email(db: impl PgExecutor<'_>, new: &NewUser) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users
            (email, phone_number, name, password_hash, role,
             is_active, is_verified, is_staff, is_superuser)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (email) DO UPDATE SET
            role = EXCLUDED.role,
            phone_number = EXCLUDED.phone_number,
            is_active = EXCLUDED.is_active,
            is_verified = EXCLUDED.is_verified,
            updated_at = NOW()
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(normalize_email(&new.email))
    .bind(&new.phone_number)
    .bind(&new.name)
    .bind(&new.password_hash)
    .bind(new.role.as_str())
    .bind(new.is_active)
    .bind(new.is_verified)
    .bind(new.is_staff)
    .bind(new.is_superuser)
    .fetch_one(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_email(db: impl PgExecutor<'_>, email: &str) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
        .bind(normalize_email(email))
        .fetch_optional(db)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(db: impl PgExecutor<'_>, user_id: Uuid) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"))
        .bind(user_id)
        .fetch_optional(db)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}
