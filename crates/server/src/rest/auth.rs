use axum::{extract::State, http::StatusCode, Json};
use sqlx::{Pool, Postgres};

use shared_types::{
    AppError, AuthResponse, AuthUser, LoginRequest, RegisterCitizenRequest, User, UserRole,
};

use crate::auth::{extractors::AuthRequired, jwt, password as pw};
use crate::error_convert::{SqlxErrorExt, ValidateRequest};
use crate::repo::{self, user::NewUser};

fn issue_token(user: User) -> Result<AuthResponse, AppError> {
    let role = user.role();
    let access_token = jwt::create_access_token(user.user_id, &user.email, role)?;
    Ok(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: jwt::access_token_expiry_minutes() * 60,
        user: AuthUser::from(user),
    })
}

/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterCitizenRequest,
    responses(
        (status = 201, description = "Citizen registered", body = AuthResponse),
        (status = 409, description = "Email or phone already in use", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(pool, payload), fields(email = %payload.email))]
pub async fn register(
    State(pool): State<Pool<Postgres>>,
    Json(payload): Json<RegisterCitizenRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.validate_request()?;

    let password_hash =
        pw::hash_password(&payload.password).map_err(|e| AppError::internal(e.to_string()))?;

    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;
    let user = repo::user::create(
        &mut *tx,
        &NewUser {
            email: payload.email,
            phone_number: payload.phone_number.trim().to_string(),
            name: payload.name.trim().to_string(),
            password_hash,
            role: UserRole::Citizen,
            is_active: true,
            is_verified: false,
            is_staff: false,
            is_superuser: false,
        },
    )
    .await?;
    repo::citizen::create(&mut *tx, user.user_id, &user.name, payload.address.as_deref()).await?;
    repo::group::add_user_to_role_group(&mut *tx, user.user_id, UserRole::Citizen).await?;
    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;

    tracing::info!(user_id = %user.user_id, "Citizen registered");
    Ok((StatusCode::CREATED, Json(issue_token(user)?)))
}

/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(pool, payload), fields(email = %payload.email))]
pub async fn login(
    State(pool): State<Pool<Postgres>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate_request()?;

    let user = repo::user::find_by_email(&pool, &payload.email)
        .await?
        .filter(|u| pw::verify_password(&payload.password, &u.password_hash))
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    if !user.is_active {
        return Err(AppError::unauthorized("Account is disabled"));
    }

    Ok(Json(issue_token(user)?))
}

/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = AuthUser),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn me(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<AuthUser>, AppError> {
    let user = repo::user::find_by_id(&pool, auth.0.sub)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;
    Ok(Json(AuthUser::from(user)))
}
