use shared_types::{AppError, User, UserRole};
use sqlx::{Pool, Postgres};
use validator::ValidateEmail;

use crate::auth::password::hash_password;
use crate::error_convert::SqlxErrorExt;
use crate::repo::{self, user::NewUser};

pub const MIN_PASSWORD_LEN: usize = 8;

// Column widths on `users`.
const MAX_EMAIL_LEN: usize = 254;
const MAX_PHONE_LEN: usize = 20;
const MAX_NAME_LEN: usize = 255;

/// Credentials for the first administrator account.
#[derive(Clone)]
pub struct NewSuperuser {
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub name: String,
}

impl std::fmt::Debug for NewSuperuser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewSuperuser")
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum SuperuserOutcome {
    Created(User),
    /// An account with this email was already there and was left untouched.
    Existing(User),
}

impl SuperuserOutcome {
    pub fn user(&self) -> &User {
        match self {
            SuperuserOutcome::Created(user) | SuperuserOutcome::Existing(user) => user,
        }
    }
}

pub fn validate_superuser(new: &NewSuperuser) -> Result<(), AppError> {
    if !new.email.validate_email() || new.email.trim().chars().count() > MAX_EMAIL_LEN {
        return Err(AppError::field("email", "Invalid email format"));
    }
    let phone = new.phone_number.trim();
    if phone.is_empty() {
        return Err(AppError::field("phone_number", "Phone number is required"));
    }
    if phone.chars().count() > MAX_PHONE_LEN {
        return Err(AppError::field(
            "phone_number",
            format!("Phone number must be at most {MAX_PHONE_LEN} characters"),
        ));
    }
    let name_len = new.name.trim().chars().count();
    if name_len == 0 || name_len > MAX_NAME_LEN {
        return Err(AppError::field(
            "name",
            format!("Name must be 1-{MAX_NAME_LEN} characters"),
        ));
    }
    if new.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::field(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

/// Create an admin account unless one with the same email exists.
#[tracing::instrument(skip(pool, new), fields(email = %new.email))]
pub async fn create_superuser(
    pool: &Pool<Postgres>,
    new: NewSuperuser,
) -> Result<SuperuserOutcome, AppError> {
    validate_superuser(&new)?;

    if let Some(existing) = repo::user::find_by_email(pool, &new.email).await? {
        tracing::info!("Superuser already exists");
        return Ok(SuperuserOutcome::Existing(existing));
    }

    let password_hash = hash_password(&new.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;
    let user = repo::user::create(
        &mut *tx,
        &NewUser {
            email: new.email,
            phone_number: new.phone_number.trim().to_string(),
            name: new.name.trim().to_string(),
            password_hash,
            role: UserRole::Admin,
            is_active: true,
            is_verified: true,
            is_staff: true,
            is_superuser: true,
        },
    )
    .await?;
    repo::group::add_user_to_role_group(&mut *tx, user.user_id, UserRole::Admin).await?;
    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;

    tracing::info!(user_id = %user.user_id, "Superuser created");
    Ok(SuperuserOutcome::Created(user))
}
