use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use shared_types::{UserRole, VerificationStatus};

use crate::common::{create_citizen, create_lawyer, create_user, get, json_request, test_app, token_for};

#[tokio::test]
async fn citizen_opens_case_with_verified_lawyer() {
    let app = test_app().await;
    let citizen = create_citizen(&app.pool, "owner@example.com", "01700000010").await;
    let (_, lawyer_profile) =
        create_lawyer(&app.pool, "advocate@example.com", "01700000011", VerificationStatus::Verified)
            .await;
    let token = token_for(citizen, "owner@example.com", UserRole::Citizen);

    let (status, body) = json_request(
        &app.router,
        "POST",
        "/api/cases",
        Some(&token),
        Some(json!({
            "title": "  Land title dispute  ",
            "description": "Neighbour claims part of the plot",
            "lawyer_id": lawyer_profile,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["title"], "Land title dispute");
    assert_eq!(body["status"], "ASSIGNED");
    assert_eq!(body["lawyer_id"], lawyer_profile.to_string());
    assert_eq!(body["citizen_user_id"], citizen.to_string());

    let (status, body) = json_request(
        &app.router,
        "POST",
        "/api/cases",
        Some(&token),
        Some(json!({"title": "Tenancy notice"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "OPEN");
    assert!(body.get("lawyer_id").is_none());
}

#[tokio::test]
async fn unverified_lawyer_cannot_be_retained() {
    let app = test_app().await;
    let citizen = create_citizen(&app.pool, "owner@example.com", "01700000020").await;
    let (_, pending) =
        create_lawyer(&app.pool, "pending@example.com", "01700000021", VerificationStatus::Pending)
            .await;
    let token = token_for(citizen, "owner@example.com", UserRole::Citizen);

    for lawyer_id in [pending, uuid::Uuid::new_v4()] {
        let (status, _) = json_request(
            &app.router,
            "POST",
            "/api/cases",
            Some(&token),
            Some(json!({"title": "Custody", "lawyer_id": lawyer_id})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn lawyers_cannot_open_cases() {
    let app = test_app().await;
    let (lawyer, _) =
        create_lawyer(&app.pool, "advocate@example.com", "01700000030", VerificationStatus::Verified)
            .await;
    let token = token_for(lawyer, "advocate@example.com", UserRole::Lawyer);

    let (status, _) = json_request(
        &app.router,
        "POST",
        "/api/cases",
        Some(&token),
        Some(json!({"title": "Should fail"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn empty_title_is_rejected() {
    let app = test_app().await;
    let citizen = create_citizen(&app.pool, "owner@example.com", "01700000040").await;
    let token = token_for(citizen, "owner@example.com", UserRole::Citizen);

    let (status, body) = json_request(
        &app.router,
        "POST",
        "/api/cases",
        Some(&token),
        Some(json!({"title": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"]["title"].is_string());
}

#[tokio::test]
async fn cases_are_scoped_to_participants() {
    let app = test_app().await;
    let owner = create_citizen(&app.pool, "owner@example.com", "01700000050").await;
    let other = create_citizen(&app.pool, "other@example.com", "01700000051").await;
    let (lawyer, lawyer_profile) =
        create_lawyer(&app.pool, "advocate@example.com", "01700000052", VerificationStatus::Verified)
            .await;
    let (outsider, _) =
        create_lawyer(&app.pool, "outsider@example.com", "01700000053", VerificationStatus::Verified)
            .await;
    let support = create_user(&app.pool, "ngo@example.com", "01700000054", UserRole::NgoSupport).await;

    let owner_token = token_for(owner, "owner@example.com", UserRole::Citizen);
    let (_, case) = json_request(
        &app.router,
        "POST",
        "/api/cases",
        Some(&owner_token),
        Some(json!({"title": "Wage theft", "lawyer_id": lawyer_profile})),
    )
    .await;
    let case_uri = format!("/api/cases/{}", case["id"].as_str().unwrap());

    let visible_count = |token: String| {
        let router = app.router.clone();
        async move {
            let (status, body) = get(&router, "/api/cases", Some(&token)).await;
            assert_eq!(status, StatusCode::OK);
            body.as_array().unwrap().len()
        }
    };

    assert_eq!(visible_count(owner_token.clone()).await, 1);
    assert_eq!(visible_count(token_for(other, "other@example.com", UserRole::Citizen)).await, 0);
    assert_eq!(visible_count(token_for(lawyer, "advocate@example.com", UserRole::Lawyer)).await, 1);
    assert_eq!(visible_count(token_for(outsider, "outsider@example.com", UserRole::Lawyer)).await, 0);
    assert_eq!(visible_count(token_for(support, "ngo@example.com", UserRole::NgoSupport)).await, 1);

    let other_token = token_for(other, "other@example.com", UserRole::Citizen);
    let (status, _) = get(&app.router, &case_uri, Some(&other_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app.router, &case_uri, Some(&owner_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Wage theft");

    let (status, _) = get(&app.router, "/api/cases/not-a-uuid", Some(&owner_token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app.router, "/api/cases", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn assigned_lawyer_records_court_metadata() {
    let app = test_app().await;
    let owner = create_citizen(&app.pool, "owner@example.com", "01700000060").await;
    let (lawyer, lawyer_profile) =
        create_lawyer(&app.pool, "advocate@example.com", "01700000061", VerificationStatus::Verified)
            .await;
    let owner_token = token_for(owner, "owner@example.com", UserRole::Citizen);
    let lawyer_token = token_for(lawyer, "advocate@example.com", UserRole::Lawyer);

    let (_, case) = json_request(
        &app.router,
        "POST",
        "/api/cases",
        Some(&owner_token),
        Some(json!({"title": "Eviction", "lawyer_id": lawyer_profile})),
    )
    .await;
    let uri = format!("/api/cases/{}/metadata", case["id"].as_str().unwrap());

    let (status, _) = json_request(
        &app.router,
        "PATCH",
        &uri,
        Some(&owner_token),
        Some(json!({"court_name": "Dhaka Judge Court"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = json_request(
        &app.router,
        "PATCH",
        &uri,
        Some(&lawyer_token),
        Some(json!({
            "case_number": "CIV-2024-117",
            "court_name": "Dhaka Judge Court",
            "filing_date": "2024-03-01",
            "status": "IN_PROGRESS",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["case_number"], "CIV-2024-117");
    assert_eq!(body["filing_date"], "2024-03-01");
    assert_eq!(body["status"], "IN_PROGRESS");

    let (status, body) = json_request(
        &app.router,
        "PATCH",
        &uri,
        Some(&lawyer_token),
        Some(json!({"presiding_judge": "Justice Rahman"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["presiding_judge"], "Justice Rahman");
    assert_eq!(body["court_name"], "Dhaka Judge Court");
    assert_eq!(body["status"], "IN_PROGRESS");
}
