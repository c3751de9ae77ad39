use pretty_assertions::assert_eq;
use server::bootstrap::{create_superuser, NewSuperuser, SuperuserOutcome};
use shared_types::{AppErrorKind, UserRole};

use crate::common::test_pool;

fn admin(password: &str) -> NewSuperuser {
    NewSuperuser {
        email: "Admin@Example.com".into(),
        phone_number: "01700000000".into(),
        password: password.into(),
        name: "Platform Admin".into(),
    }
}

#[tokio::test]
async fn creates_superuser_once() {
    let (pool, _guard) = test_pool().await;

    let created = create_superuser(&pool, admin("a-strong-password")).await.unwrap();
    let SuperuserOutcome::Created(user) = created else {
        panic!("expected a new superuser");
    };
    assert_eq!(user.email, "admin@example.com");
    assert_eq!(user.role(), UserRole::Admin);
    assert!(user.is_staff && user.is_superuser && user.is_active && user.is_verified);
    assert!(server::auth::password::verify_password("a-strong-password", &user.password_hash));

    let groups = server::repo::group::list_for_user(&pool, user.user_id).await.unwrap();
    assert_eq!(groups, vec!["ADMIN".to_string()]);

    let again = create_superuser(&pool, admin("another-password")).await.unwrap();
    match again {
        SuperuserOutcome::Existing(existing) => {
            assert_eq!(existing.user_id, user.user_id);
            assert_eq!(existing.password_hash, user.password_hash);
        }
        SuperuserOutcome::Created(_) => panic!("superuser created twice"),
    }
}

#[tokio::test]
async fn short_password_creates_nothing() {
    let (pool, _guard) = test_pool().await;

    let err = create_superuser(&pool, admin("short")).await.unwrap_err();
    assert_eq!(err.kind, AppErrorKind::ValidationError);

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 0);
}

#[tokio::test]
async fn taken_phone_number_is_a_conflict() {
    let (pool, _guard) = test_pool().await;
    crate::common::create_user(&pool, "someone@example.com", "01700000000", UserRole::Citizen).await;

    let err = create_superuser(&pool, admin("a-strong-password")).await.unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Conflict);
    assert_eq!(err.message, "This phone number is already in use");
}

#[tokio::test]
async fn oversized_phone_is_a_field_error() {
    let (pool, _guard) = test_pool().await;

    let mut new = admin("a-strong-password");
    new.phone_number = "+880 1700 000 000 ext 12".into();
    let err = create_superuser(&pool, new).await.unwrap_err();
    assert_eq!(err.kind, AppErrorKind::ValidationError);
    assert!(err.field_errors.contains_key("phone_number"));

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 0);
}
