use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use shared_types::{UserRole, VerificationStatus};

use crate::common::{create_citizen, create_lawyer, create_user, get, json_request, test_app, token_for};

#[tokio::test]
async fn lists_seeded_lawyers_with_specializations() {
    let app = test_app().await;
    server::seed::seed_lawyers(&app.pool).await.unwrap();

    let (status, body) = get(&app.router, "/api/lawyers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 4);

    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["full_name_en"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Anik Chowdhury", "Farhana Siddiqui", "Labib Rahman", "Nabila Hoque"]
    );

    let anik = &body["data"][0];
    assert_eq!(anik["verification_status"], "VERIFIED");
    assert_eq!(anik["specializations"][0]["slug"], "criminal-defense");
    assert_eq!(anik["specializations"][0]["name_bn"], "ফৌজদারি আইন");
    assert!(anik["experience_years"].as_i64().unwrap() >= 14);
    assert!(anik.get("profile_photo_url").is_none());
}

#[tokio::test]
async fn filters_by_specialization_and_paginates() {
    let app = test_app().await;
    server::seed::seed_lawyers(&app.pool).await.unwrap();

    let (status, body) = get(&app.router, "/api/lawyers?specialization=family-law", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["email"], "farhana.siddiqui@example.com");

    let (_, body) = get(&app.router, "/api/lawyers?specialization=maritime-law", None).await;
    assert_eq!(body["meta"]["total"], 0);

    let (_, body) = get(&app.router, "/api/lawyers?page=2&limit=3", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["total_pages"], 2);
    assert_eq!(body["meta"]["has_prev"], true);
}

#[tokio::test]
async fn specializations_are_listed_by_name() {
    let app = test_app().await;
    server::seed::seed_lawyers(&app.pool).await.unwrap();

    let (status, body) = get(&app.router, "/api/specializations", None).await;
    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["slug"].as_str().unwrap())
        .collect();
    assert_eq!(
        slugs,
        vec!["corporate-law", "criminal-defense", "family-law", "property-law"]
    );
}

#[tokio::test]
async fn pending_lawyers_are_hidden_from_the_public() {
    let app = test_app().await;
    let (lawyer_user, profile_id) =
        create_lawyer(&app.pool, "pending@example.com", "01900000001", VerificationStatus::Pending)
            .await;

    let (_, body) = get(&app.router, "/api/lawyers", None).await;
    assert_eq!(body["meta"]["total"], 0);

    let uri = format!("/api/lawyers/{profile_id}");
    let (status, _) = get(&app.router, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let own = token_for(lawyer_user, "pending@example.com", UserRole::Lawyer);
    let (status, body) = get(&app.router, &uri, Some(&own)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verification_status"], "PENDING");
}

#[tokio::test]
async fn unknown_lawyer_is_404() {
    let app = test_app().await;

    let (status, _) = get(&app.router, &format!("/api/lawyers/{}", uuid::Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app.router, "/api/lawyers/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_admins_change_verification() {
    let app = test_app().await;
    let (_, profile_id) =
        create_lawyer(&app.pool, "review@example.com", "01900000002", VerificationStatus::Pending)
            .await;
    let citizen = create_citizen(&app.pool, "citizen@example.com", "01900000003").await;
    let admin = create_user(&app.pool, "admin@example.com", "01900000004", UserRole::Admin).await;

    let uri = format!("/api/admin/lawyers/{profile_id}/verification");
    let body = json!({"verification_status": "VERIFIED", "note": "Bar council certificate checked"});

    let citizen_token = token_for(citizen, "citizen@example.com", UserRole::Citizen);
    let (status, _) =
        json_request(&app.router, "PATCH", &uri, Some(&citizen_token), Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = json_request(&app.router, "PATCH", &uri, None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin_token = token_for(admin, "admin@example.com", UserRole::Admin);
    let (status, resp) =
        json_request(&app.router, "PATCH", &uri, Some(&admin_token), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{resp}");
    assert_eq!(resp["verification_status"], "VERIFIED");

    let (_, listing) = get(&app.router, "/api/lawyers", None).await;
    assert_eq!(listing["meta"]["total"], 1);
}
