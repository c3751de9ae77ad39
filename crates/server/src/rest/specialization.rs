use axum::{extract::State, Json};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, SpecializationResponse};

/// GET /api/specializations
#[utoipa::path(
    get,
    path = "/api/specializations",
    responses(
        (status = 200, description = "Active specializations", body = Vec<SpecializationResponse>)
    ),
    tag = "lawyers"
)]
pub async fn list_specializations(
    State(pool): State<Pool<Postgres>>,
) -> Result<Json<Vec<SpecializationResponse>>, AppError> {
    let specs = crate::repo::specialization::list_active(&pool).await?;
    Ok(Json(specs.into_iter().map(SpecializationResponse::from).collect()))
}
