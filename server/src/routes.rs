use std::sync::Arc;

use askdoc_core::error::AppError;
use askdoc_core::extract;
use askdoc_core::users;
use askdoc_qa::PipelineOutcome;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tower_http::trace::TraceLayer;

use crate::auth::{require_session, CurrentUser};
use crate::state::AppState;

pub const MSG_NO_CONFIDENT_ANSWER: &str =
    "I couldn't find a confident answer in the uploaded document.";
pub const MSG_NO_DOCUMENT: &str = "No document uploaded yet. Please upload first.";
pub const MSG_EMPTY_QUESTION: &str = "Ask a non-empty question";

/// Renders an [`AppError`] as a structured JSON response at the HTTP
/// boundary.
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.code.as_str() {
            "AUTH_INVALID_CREDENTIALS" => StatusCode::UNAUTHORIZED,
            "AUTH_USERNAME_TAKEN" => StatusCode::CONFLICT,
            code if code.starts_with("AUTH_") || code.starts_with("UPLOAD_") => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self.0)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

fn now_rfc3339_utc() -> Result<String, AppError> {
    OffsetDateTime::now_utc().format(&Rfc3339).map_err(|e| {
        AppError::new("TIME_FORMAT_FAILED", "Failed to format time").with_details(e.to_string())
    })
}

async fn signup(
    State(state): State<Arc<AppState>>,
    Json(creds): Json<Credentials>,
) -> Result<Json<MessageResponse>, ApiError> {
    let conn = state.open_db()?;
    let now = now_rfc3339_utc()?;
    let user = users::sign_up(&conn, &creds.username, &creds.password, &now)?;
    tracing::info!(username = %user.username, "account created");
    Ok(Json(MessageResponse {
        message: "Account created. Please sign in.".to_string(),
    }))
}

async fn signin(
    State(state): State<Arc<AppState>>,
    Json(creds): Json<Credentials>,
) -> Result<Json<SignInResponse>, ApiError> {
    let conn = state.open_db()?;
    let now = now_rfc3339_utc()?;
    let session = users::sign_in(&conn, &creds.username, &creds.password, &now)?;
    tracing::info!(user_id = session.user_id, "signed in");
    Ok(Json(SignInResponse {
        token: session.token,
        message: "Signed in successfully".to_string(),
    }))
}

async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<MessageResponse>, ApiError> {
    let conn = state.open_db()?;
    users::sign_out(&conn, &current.token)?;
    tracing::info!(user_id = current.user.id, "logged out");
    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

async fn upload(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::new("UPLOAD_INVALID_BODY", "Failed to read multipart body")
            .with_details(e.to_string())
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(AppError::new("UPLOAD_NO_FILE", "No selected file").into()),
        };
        let bytes = field.bytes().await.map_err(|e| {
            AppError::new("UPLOAD_INVALID_BODY", "Failed to read uploaded file")
                .with_details(e.to_string())
        })?;
        file = Some((filename, bytes.to_vec()));
        break;
    }

    let (filename, bytes) = match file {
        Some(f) => f,
        None => return Err(AppError::new("UPLOAD_NO_FILE", "No file part").into()),
    };

    let text = extract::extract_text(&filename, &bytes)?;
    if text.trim().is_empty() {
        return Ok(Json(MessageResponse {
            message: "Uploaded but no text extracted".to_string(),
        }));
    }

    state.store.save_text(current.user.id, &text)?;
    tracing::info!(
        user_id = current.user.id,
        filename = %filename,
        chars = text.chars().count(),
        "document ingested"
    );
    Ok(Json(MessageResponse {
        message: "File uploaded and processed successfully".to_string(),
    }))
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let question = req.question.trim();
    if question.is_empty() {
        return Ok(Json(AskResponse {
            answer: MSG_EMPTY_QUESTION.to_string(),
        }));
    }

    let doc_text = state.store.load_text(current.user.id)?.unwrap_or_default();
    if doc_text.trim().is_empty() {
        return Ok(Json(AskResponse {
            answer: MSG_NO_DOCUMENT.to_string(),
        }));
    }

    // The pipeline never faults the request: internal failures degrade to a
    // diagnostic answer string.
    let answer = match askdoc_qa::run_pipeline(&doc_text, question) {
        Ok(PipelineOutcome::Answered { text }) => text,
        Ok(PipelineOutcome::NoConfidentMatch) => {
            tracing::debug!(user_id = current.user.id, "no confident match");
            MSG_NO_CONFIDENT_ANSWER.to_string()
        }
        Ok(PipelineOutcome::NoVocabulary) => {
            tracing::debug!(user_id = current.user.id, "vector space had no vocabulary");
            MSG_NO_CONFIDENT_ANSWER.to_string()
        }
        Err(e) => {
            tracing::warn!(user_id = current.user.id, "pipeline failed: {e}");
            format!("Could not compute answer: {e}")
        }
    };

    Ok(Json(AskResponse { answer }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn build_router(shared: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/api/logout", post(logout))
        .route("/api/upload", post(upload))
        .route("/api/ask", post(ask))
        .route_layer(middleware::from_fn_with_state(
            shared.clone(),
            require_session,
        ));

    let public = Router::new()
        .route("/api/signup", post(signup))
        .route("/api/signin", post(signin))
        .route("/health", get(health));

    protected
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
