use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::jwt::validate_access_token;

/// Permissive auth middleware.
///
/// Validates a `Bearer` access token when one is present and inserts its
/// `Claims` into the request extensions. Never rejects; handlers decide
/// authorization through the extractors.
pub async fn auth_middleware(mut req: Request, next: Next) -> Response {
    if let Some(token) = bearer_token(req.headers()) {
        match validate_access_token(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid bearer token");
            }
        }
    }

    next.run(req).await
}

fn bearer_token(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            v.strip_prefix("Bearer ")
                .or_else(|| v.strip_prefix("bearer "))
        })
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
