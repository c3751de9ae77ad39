use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use shared_types::{MediaConfig, UserRole, VerificationStatus};
use sqlx::{Pool, Postgres};
use tempfile::TempDir;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

use server::repo::{self, lawyer::LawyerProfileFields, user::NewUser};

/// Global mutex ensuring tests run sequentially against the shared database.
/// Each test acquires this lock before truncating, preventing concurrent
/// tests from interfering with each other's data.
static TEST_MUTEX: std::sync::LazyLock<Mutex<()>> = std::sync::LazyLock::new(|| Mutex::new(()));

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Everything a test needs. Hold it for the whole test: dropping it
/// releases the database lock and deletes the media directory.
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Postgres>,
    pub media: TempDir,
    _guard: tokio::sync::MutexGuard<'static, ()>,
}

/// Connect to the test database, apply migrations and truncate every table
/// except the migration-seeded auth groups.
pub async fn test_pool() -> (Pool<Postgres>, tokio::sync::MutexGuard<'static, ()>) {
    // Acquire the global test lock, held until the test completes
    let guard = TEST_MUTEX.lock().await;

    let _ = dotenvy::dotenv();
    if std::env::var("JWT_SECRET").map(|s| s.is_empty()).unwrap_or(true) {
        std::env::set_var("JWT_SECRET", "integration-test-secret");
    }

    let database_url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("TEST_DATABASE_URL or DATABASE_URL must be set for tests");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    server::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query(
        "TRUNCATE evidence_documents, cases, lawyer_specialization_map, lawyer_profiles, \
         citizen_profiles, legal_specializations, user_groups, users CASCADE",
    )
    .execute(&pool)
    .await
    .expect("Failed to truncate");

    (pool, guard)
}

/// Build the full application router over a fresh database and an empty
/// temporary media root. Media URLs are `/media/...`.
pub async fn test_app() -> TestApp {
    test_app_with(|_| {}).await
}

/// Like [`test_app`], with a hook to adjust the media settings.
pub async fn test_app_with(configure: impl FnOnce(&mut MediaConfig)) -> TestApp {
    let (pool, guard) = test_pool().await;
    let media = tempfile::tempdir().expect("Failed to create media dir");

    let mut media_config = MediaConfig {
        root: media.path().to_string_lossy().into_owned(),
        url: "/media/".to_string(),
        max_upload_bytes: 64 * 1024,
        public_base_url: None,
    };
    configure(&mut media_config);

    let state = server::db::AppState {
        pool: pool.clone(),
        media: media_config,
    };
    let router = server::openapi::api_router(state, false);

    TestApp {
        router,
        pool,
        media,
        _guard: guard,
    }
}

/// Number of regular files anywhere under `dir`. A missing directory has none.
pub fn files_under(dir: &std::path::Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(Result::ok)
        .map(|entry| {
            let path = entry.path();
            if path.is_dir() {
                files_under(&path)
            } else {
                1
            }
        })
        .sum()
}

/// Insert an account with `TEST_PASSWORD` and return its id.
pub async fn create_user(pool: &Pool<Postgres>, email: &str, phone: &str, role: UserRole) -> Uuid {
    let password_hash = server::auth::password::hash_password(TEST_PASSWORD).unwrap();
    let user = repo::user::create(
        pool,
        &NewUser {
            email: email.to_string(),
            phone_number: phone.to_string(),
            name: email.split('@').next().unwrap_or_default().to_string(),
            password_hash,
            role,
            is_active: true,
            is_verified: true,
            is_staff: role == UserRole::Admin,
            is_superuser: false,
        },
    )
    .await
    .expect("Failed to create user");
    repo::group::add_user_to_role_group(pool, user.user_id, role)
        .await
        .expect("Failed to add group");
    user.user_id
}

/// Insert a citizen with a profile. Returns the user id.
pub async fn create_citizen(pool: &Pool<Postgres>, email: &str, phone: &str) -> Uuid {
    let user_id = create_user(pool, email, phone, UserRole::Citizen).await;
    repo::citizen::create(pool, user_id, "Test Citizen", Some("Mirpur, Dhaka"))
        .await
        .expect("Failed to create citizen profile");
    user_id
}

/// Insert a lawyer account and profile. Returns (user id, profile id).
pub async fn create_lawyer(
    pool: &Pool<Postgres>,
    email: &str,
    phone: &str,
    status: VerificationStatus,
) -> (Uuid, Uuid) {
    let user_id = create_user(pool, email, phone, UserRole::Lawyer).await;
    let bar_number = format!("BAR-{}", &phone[phone.len().saturating_sub(6)..]);
    let profile = repo::lawyer::upsert_profile(
        pool,
        &LawyerProfileFields {
            user_id,
            full_name_en: "Test Lawyer",
            full_name_bn: "Test Lawyer",
            license_issue_date: chrono::NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            bar_council_number: &bar_number,
            bio_en: "",
            bio_bn: "",
            chamber_address: "Motijheel, Dhaka",
            consultation_fee_online: 1500,
            consultation_fee_offline: 2000,
            verification_status: status,
        },
    )
    .await
    .expect("Failed to create lawyer profile");
    (user_id, profile.id)
}

/// Access token for an account, as login would issue it.
pub fn token_for(user_id: Uuid, email: &str, role: UserRole) -> String {
    server::auth::jwt::create_access_token(user_id, email, role).unwrap()
}

/// Send a JSON request, optionally authenticated.
pub async fn json_request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("host", "localhost:8000");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send(app, req).await
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    json_request(app, "GET", uri, token, None).await
}

/// POST a multipart body carrying one field.
pub async fn post_file(
    app: &Router,
    uri: &str,
    token: &str,
    field: &str,
    file_name: &str,
    content: &[u8],
) -> (StatusCode, Value) {
    let boundary = "legalaid-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("host", "localhost:8000")
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    send(app, req).await
}

/// Send a request through the router and parse the response.
async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&body_bytes).to_string(),
        ))
    };

    (status, body)
}
