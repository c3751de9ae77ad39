use axum::{extract::DefaultBodyLimit, middleware, Router};
use shared_types::{
    AppError, AppErrorKind, AuthResponse, AuthUser, CaseResponse, CaseStatus,
    CitizenProfileResponse, CreateCaseRequest, EvidenceResponse, LawyerResponse, LoginRequest,
    MediaKind, MediaUploadResponse, PaginatedResponse, PaginationMeta, ProfileResponse,
    RegisterCitizenRequest, SpecializationResponse, UpdateCaseMetadataRequest,
    UpdateVerificationRequest, UserRole, VerificationStatus,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use tower_http::services::ServeDir;
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::health::{self, HealthResponse};
use crate::media::FileUpload;
use crate::rest;
use crate::telemetry::OtelTraceLayer;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI documentation for the API.
#[derive(OpenApi)]
#[openapi(
    paths(
        rest::auth::register,
        rest::auth::login,
        rest::auth::me,
        rest::specialization::list_specializations,
        rest::lawyer::list_lawyers,
        rest::lawyer::get_lawyer,
        rest::lawyer::update_verification,
        rest::profile::get_profile,
        rest::profile::upload_profile_media,
        rest::case::create_case,
        rest::case::list_cases,
        rest::case::get_case,
        rest::case::update_case_metadata,
        rest::evidence::upload_evidence,
        rest::evidence::list_evidence,
        health::health_check,
    ),
    components(schemas(
        AppError, AppErrorKind, UserRole, AuthUser, AuthResponse,
        RegisterCitizenRequest, LoginRequest,
        SpecializationResponse, VerificationStatus, LawyerResponse, UpdateVerificationRequest,
        PaginationMeta, PaginatedResponse<LawyerResponse>,
        CitizenProfileResponse, ProfileResponse, MediaKind, MediaUploadResponse, FileUpload,
        CaseStatus, CaseResponse, CreateCaseRequest, UpdateCaseMetadataRequest,
        EvidenceResponse, HealthResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Citizen sign-up and login"),
        (name = "lawyers", description = "Lawyer directory and specializations"),
        (name = "admin", description = "Administrator actions"),
        (name = "profile", description = "The caller's own profile and documents"),
        (name = "cases", description = "Legal-aid cases and court metadata"),
        (name = "evidence", description = "Evidence uploads attached to cases"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "Legal Aid API",
        description = "Connects citizens with verified lawyers and tracks their cases",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build the application router: REST API, `/health` and the API docs at
/// `/docs`. Bearer tokens are decoded for every route; routes decide
/// authorization through the extractors. `telemetry` adds one OTLP span per
/// request, tagged with the caller when a token was presented.
pub fn api_router(state: AppState, telemetry: bool) -> Router {
    let body_limit = state
        .media
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);

    let mut router = rest::api_router()
        .route("/health", axum::routing::get(health::health_check))
        .layer(DefaultBodyLimit::max(body_limit));
    if telemetry {
        router = router.layer(OtelTraceLayer);
    }

    let media_prefix = media_mount_point(&state.media.url);
    let media_root = state.media.root.clone();

    let mut app = router
        .layer(middleware::from_fn(crate::auth::middleware::auth_middleware))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));
    if let Some(prefix) = media_prefix {
        app = app.nest_service(&prefix, ServeDir::new(media_root));
    }
    app
}

/// Path the media directory is served under, when `media_url` is a local
/// path such as `/media/`. Absolute URLs point at another host and empty
/// prefixes cannot be mounted.
fn media_mount_point(media_url: &str) -> Option<String> {
    let prefix = media_url.trim_end_matches('/');
    (prefix.starts_with('/') && prefix.len() > 1).then(|| prefix.to_string())
}
