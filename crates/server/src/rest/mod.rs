pub mod auth;
pub mod case;
pub mod evidence;
pub mod lawyer;
pub mod profile;
pub mod specialization;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::db::AppState;

/// Build the REST API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // Lawyer directory
        .route("/api/specializations", get(specialization::list_specializations))
        .route("/api/lawyers", get(lawyer::list_lawyers))
        .route("/api/lawyers/{id}", get(lawyer::get_lawyer))
        .route(
            "/api/admin/lawyers/{id}/verification",
            patch(lawyer::update_verification),
        )
        // Own profile
        .route("/api/profile", get(profile::get_profile))
        .route("/api/profile/media/{kind}", post(profile::upload_profile_media))
        // Cases
        .route("/api/cases", post(case::create_case).get(case::list_cases))
        .route("/api/cases/{id}", get(case::get_case))
        .route("/api/cases/{id}/metadata", patch(case::update_case_metadata))
        .route(
            "/api/cases/{id}/evidence",
            post(evidence::upload_evidence).get(evidence::list_evidence),
        )
}
