use std::sync::Arc;

use askdoc_core::users::{self, User};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::routes::ApiError;
use crate::state::AppState;

/// Authenticated user plus the session token that proved it, attached to
/// the request by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// Clients carry the session token in the `X-Session-Token` header; the
/// `?token=` query parameter is accepted as a fallback.
pub fn token_from_parts(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    if let Some(v) = headers.get("X-Session-Token").and_then(|v| v.to_str().ok()) {
        if !v.is_empty() {
            return Some(v.to_string());
        }
    }
    if let Some(query) = query {
        for pair in query.split('&') {
            if let Some(token) = pair.strip_prefix("token=") {
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }
    None
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "message": message })),
    )
        .into_response()
}

/// Session middleware: resolves the token to a user and attaches it to the
/// request, or rejects with a structured 401.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match token_from_parts(req.headers(), req.uri().query()) {
        Some(t) => t,
        None => return unauthorized("Sign in required"),
    };

    let conn = match state.open_db() {
        Ok(c) => c,
        Err(e) => return ApiError(e).into_response(),
    };

    match users::user_for_token(&conn, &token) {
        Ok(Some(user)) => {
            req.extensions_mut().insert(CurrentUser { user, token });
            next.run(req).await
        }
        Ok(None) => unauthorized("Invalid or expired session"),
        Err(e) => ApiError(e).into_response(),
    }
}
