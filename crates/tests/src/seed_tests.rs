use pretty_assertions::assert_eq;
use shared_types::UserRole;

use crate::common::test_pool;

async fn count(pool: &sqlx::PgPool, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
}

#[tokio::test]
async fn seeding_twice_yields_same_directory() {
    let (pool, _guard) = test_pool().await;

    let first = server::seed::seed_lawyers(&pool).await.unwrap();
    let bar_numbers_before: Vec<String> =
        sqlx::query_scalar("SELECT bar_council_number FROM lawyer_profiles ORDER BY full_name_en")
            .fetch_all(&pool)
            .await
            .unwrap();

    let second = server::seed::seed_lawyers(&pool).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(second.specializations, 4);
    assert_eq!(second.lawyers, 4);
    assert_eq!(second.specialization_links, 4);
    assert!(second.skipped_slugs.is_empty());

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM legal_specializations").await, 4);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM lawyer_profiles").await, 4);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM users").await, 4);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM lawyer_specialization_map").await, 4);

    let bar_numbers_after: Vec<String> =
        sqlx::query_scalar("SELECT bar_council_number FROM lawyer_profiles ORDER BY full_name_en")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(bar_numbers_before, bar_numbers_after);
}

#[tokio::test]
async fn seeded_lawyers_are_verified_and_grouped() {
    let (pool, _guard) = test_pool().await;
    server::seed::seed_lawyers(&pool).await.unwrap();

    let user = server::repo::user::find_by_email(&pool, "anik.chowdhury@example.com")
        .await
        .unwrap()
        .expect("seeded user");
    assert_eq!(user.role(), UserRole::Lawyer);
    assert!(user.is_active && user.is_verified);
    assert!(!server::auth::password::is_usable(&user.password_hash));

    let profile = server::repo::lawyer::find_by_user_id(&pool, user.user_id)
        .await
        .unwrap()
        .expect("seeded profile");
    assert_eq!(profile.verification_status, "VERIFIED");
    assert_eq!(profile.consultation_fee_online, 3000);
    assert_eq!(profile.consultation_fee_offline, 3000);
    assert_eq!(profile.chamber_address, "Chittagong, Bangladesh");
    assert_eq!(
        profile.bar_council_number,
        server::seed::bar_council_number(user.user_id)
    );

    let groups = server::repo::group::list_for_user(&pool, user.user_id).await.unwrap();
    assert_eq!(groups, vec!["LAWYER".to_string()]);

    let spec: (String, String) = sqlx::query_as(
        "SELECT description_en, description_bn FROM legal_specializations WHERE slug = 'property-law'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(spec.0, "Property & Land related matters.");
    assert_eq!(spec.1, "সম্পত্তি আইন");
}

#[tokio::test]
async fn seeding_keeps_existing_password_and_forces_role() {
    let (pool, _guard) = test_pool().await;
    crate::common::create_user(&pool, "nabila.hoque@example.com", "01999999999", UserRole::Citizen)
        .await;
    let before = server::repo::user::find_by_email(&pool, "nabila.hoque@example.com")
        .await
        .unwrap()
        .unwrap();

    server::seed::seed_lawyers(&pool).await.unwrap();

    let after = server::repo::user::find_by_email(&pool, "nabila.hoque@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.user_id, before.user_id);
    assert_eq!(after.password_hash, before.password_hash);
    assert_eq!(after.role(), UserRole::Lawyer);
    assert_eq!(after.phone_number, "01710000004");

    let groups = server::repo::group::list_for_user(&pool, after.user_id).await.unwrap();
    assert_eq!(groups, vec!["LAWYER".to_string()]);
}

#[tokio::test]
async fn stale_specialization_links_are_replaced() {
    let (pool, _guard) = test_pool().await;
    server::seed::seed_lawyers(&pool).await.unwrap();

    // Attach an extra specialization to one seeded lawyer.
    sqlx::query(
        r#"
        INSERT INTO lawyer_specialization_map (lawyer_id, specialization_id)
        SELECT p.id, s.id
        FROM lawyer_profiles p, legal_specializations s
        WHERE p.full_name_en = 'Farhana Siddiqui' AND s.slug = 'corporate-law'
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM lawyer_specialization_map").await, 5);

    server::seed::seed_lawyers(&pool).await.unwrap();
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM lawyer_specialization_map").await, 4);
}
