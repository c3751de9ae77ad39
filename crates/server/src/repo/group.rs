use shared_types::{AppError, RoleGroup, UserRole};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// All auth groups, by name.
pub async fn list(db: impl PgExecutor<'_>) -> Result<Vec<RoleGroup>, AppError> {
    sqlx::query_as::<_, RoleGroup>("SELECT id, name FROM auth_groups ORDER BY name ASC")
        .fetch_all(db)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Put a user in the group named after `role`. No-op if already a member.
/// Returns `false` when the group does not exist.
pub async fn add_user_to_role_group(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
    role: UserRole,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO user_groups (user_id, group_id)
        SELECT $1, id FROM auth_groups WHERE name = $2
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(role.as_str())
    .execute(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    if result.rows_affected() == 0 {
        tracing::debug!(%user_id, group = role.as_str(), "User already in group or group missing");
    }
    Ok(result.rows_affected() > 0)
}

/// Drop the user from every role group except the one for `role`.
/// Groups that are not named after a role are left alone.
pub async fn remove_user_from_other_role_groups(
    db: impl PgExecutor<'_>,
    user_id: Uuid,
    role: UserRole,
) -> Result<u64, AppError> {
    let other_roles: Vec<&str> = UserRole::ALL
        .iter()
        .filter(|r| **r != role)
        .map(UserRole::as_str)
        .collect();

    let result = sqlx::query(
        r#"
        DELETE FROM user_groups ug
        USING auth_groups g
        WHERE ug.group_id = g.id
          AND ug.user_id = $1
          AND g.name = ANY($2)
        "#,
    )
    .bind(user_id)
    .bind(&other_roles)
    .execute(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected())
}

/// Names of the groups a user belongs to.
pub async fn list_for_user(db: impl PgExecutor<'_>, user_id: Uuid) -> Result<Vec<String>, AppError> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT g.name
        FROM auth_groups g
        JOIN user_groups ug ON ug.group_id = g.id
        WHERE ug.user_id = $1
        ORDER BY g.name ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
