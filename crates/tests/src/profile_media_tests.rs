use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use shared_types::{UserRole, VerificationStatus};

use crate::common::{
    create_citizen, create_lawyer, create_user, files_under, get, post_file, test_app,
    test_app_with, token_for,
};

#[tokio::test]
async fn citizen_uploads_profile_photo() {
    let app = test_app().await;
    let citizen = create_citizen(&app.pool, "photo@example.com", "01500000001").await;
    let token = token_for(citizen, "photo@example.com", UserRole::Citizen);

    let (status, body) = post_file(
        &app.router,
        "/api/profile/media/profile-photo",
        &token,
        "file",
        "me.JPG",
        b"jpeg bytes",
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["kind"], "profile-photo");
    assert_eq!(body["size_bytes"], 10);
    let url = body["url"].as_str().unwrap();
    assert!(
        url.starts_with("http://localhost:8000/media/profiles/citizen/profile-photo/"),
        "{url}"
    );
    assert!(url.ends_with(".jpg"));

    let path = body["path"].as_str().unwrap();
    assert!(app.media.path().join(path).is_file());

    let (status, profile) = get(&app.router, "/api/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["role"], "CITIZEN");
    assert_eq!(profile["profile"]["profile_photo_url"], url);
    assert!(profile["profile"].get("identity_document_url").is_none());
}

#[tokio::test]
async fn replacing_media_points_at_newest_file() {
    let app = test_app().await;
    let citizen = create_citizen(&app.pool, "again@example.com", "01500000002").await;
    let token = token_for(citizen, "again@example.com", UserRole::Citizen);
    let uri = "/api/profile/media/identity-document";

    let (_, first) = post_file(&app.router, uri, &token, "file", "nid.pdf", b"front").await;
    let (_, second) = post_file(&app.router, uri, &token, "file", "nid.pdf", b"front and back").await;
    assert_ne!(first["path"], second["path"]);

    let (_, profile) = get(&app.router, "/api/profile", Some(&token)).await;
    assert_eq!(profile["profile"]["identity_document_url"], second["url"]);

    let (_, third) = post_file(&app.router, uri, &token, "file", "nid.pdf", b"rescanned").await;
    let media = app.media.path();
    assert!(!media.join(first["path"].as_str().unwrap()).exists());
    assert!(!media.join(second["path"].as_str().unwrap()).exists());
    assert!(media.join(third["path"].as_str().unwrap()).is_file());
    assert_eq!(files_under(media), 1);
}

#[tokio::test]
async fn other_media_kinds_are_not_touched_by_a_replacement() {
    let app = test_app().await;
    let citizen = create_citizen(&app.pool, "both@example.com", "01500000008").await;
    let token = token_for(citizen, "both@example.com", UserRole::Citizen);

    let (_, photo) =
        post_file(&app.router, "/api/profile/media/profile-photo", &token, "file", "me.png", b"png")
            .await;
    post_file(&app.router, "/api/profile/media/identity-document", &token, "file", "a.pdf", b"1").await;
    post_file(&app.router, "/api/profile/media/identity-document", &token, "file", "b.pdf", b"2").await;

    assert!(app.media.path().join(photo["path"].as_str().unwrap()).is_file());
    assert_eq!(files_under(app.media.path()), 2);
}

#[tokio::test]
async fn oversized_profile_upload_is_rejected() {
    let app = test_app().await;
    let citizen = create_citizen(&app.pool, "big@example.com", "01500000009").await;
    let token = token_for(citizen, "big@example.com", UserRole::Citizen);

    let big = vec![b'x'; 64 * 1024 + 1];
    let (status, body) = post_file(
        &app.router,
        "/api/profile/media/profile-photo",
        &token,
        "file",
        "huge.jpg",
        &big,
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["kind"], "PayloadTooLarge");
    assert_eq!(files_under(app.media.path()), 0);

    let (_, profile) = get(&app.router, "/api/profile", Some(&token)).await;
    assert!(profile["profile"].get("profile_photo_url").is_none());
}

#[tokio::test]
async fn configured_base_url_wins_over_request_host() {
    let app = test_app_with(|media| {
        media.public_base_url = Some("https://legalaid.example.org".to_string());
    })
    .await;
    let citizen = create_citizen(&app.pool, "base@example.com", "01500000010").await;
    let token = token_for(citizen, "base@example.com", UserRole::Citizen);

    // The request itself arrives with Host: localhost:8000.
    let (status, body) =
        post_file(&app.router, "/api/profile/media/profile-photo", &token, "file", "me.png", b"png")
            .await;
    assert_eq!(status, StatusCode::OK);
    let url = body["url"].as_str().unwrap();
    assert!(
        url.starts_with("https://legalaid.example.org/media/profiles/citizen/profile-photo/"),
        "{url}"
    );

    let (_, profile) = get(&app.router, "/api/profile", Some(&token)).await;
    assert_eq!(profile["profile"]["profile_photo_url"], url);
}

#[tokio::test]
async fn lawyer_uploads_verification_document() {
    let app = test_app().await;
    let (lawyer, _) =
        create_lawyer(&app.pool, "docs@example.com", "01500000003", VerificationStatus::Pending)
            .await;
    let token = token_for(lawyer, "docs@example.com", UserRole::Lawyer);

    let (status, body) = post_file(
        &app.router,
        "/api/profile/media/verification-document",
        &token,
        "file",
        "bar-certificate.pdf",
        b"certificate",
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["path"]
        .as_str()
        .unwrap()
        .starts_with("profiles/lawyer/verification-document/"));

    let (status, profile) = get(&app.router, "/api/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["role"], "LAWYER");
    assert_eq!(profile["profile"]["verification_document_url"], body["url"]);
    assert_eq!(profile["profile"]["email"], "docs@example.com");
}

#[tokio::test]
async fn citizens_cannot_upload_verification_documents() {
    let app = test_app().await;
    let citizen = create_citizen(&app.pool, "nope@example.com", "01500000004").await;
    let token = token_for(citizen, "nope@example.com", UserRole::Citizen);

    let (status, _) = post_file(
        &app.router,
        "/api/profile/media/verification-document",
        &token,
        "file",
        "fake.pdf",
        b"fake",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(std::fs::read_dir(app.media.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn staff_accounts_have_no_profile_media() {
    let app = test_app().await;
    let ngo = create_user(&app.pool, "ngo@example.com", "01500000005", UserRole::NgoSupport).await;
    let token = token_for(ngo, "ngo@example.com", UserRole::NgoSupport);

    let (status, _) =
        post_file(&app.router, "/api/profile/media/profile-photo", &token, "file", "a.png", b"png").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = get(&app.router, "/api/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_kind_and_missing_file() {
    let app = test_app().await;
    let citizen = create_citizen(&app.pool, "kind@example.com", "01500000006").await;
    let token = token_for(citizen, "kind@example.com", UserRole::Citizen);

    let (status, _) =
        post_file(&app.router, "/api/profile/media/selfie", &token, "file", "a.png", b"png").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
        post_file(&app.router, "/api/profile/media/profile-photo", &token, "photo", "a.png", b"png")
            .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field_errors"]["file"], "File object is required");
}

#[tokio::test]
async fn uploaded_media_is_served() {
    let app = test_app().await;
    let citizen = create_citizen(&app.pool, "served@example.com", "01500000007").await;
    let token = token_for(citizen, "served@example.com", UserRole::Citizen);

    let (_, body) =
        post_file(&app.router, "/api/profile/media/profile-photo", &token, "file", "a.txt", b"pixels")
            .await;
    let served_path = format!("/media/{}", body["path"].as_str().unwrap());

    let response = tower::ServiceExt::oneshot(
        app.router.clone(),
        axum::http::Request::builder()
            .uri(served_path)
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"pixels");
}
