// REST API endpoints for the account service

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header::AUTHORIZATION},
    response::Json,
    routing::{get, post},
};
use axum::http::HeaderMap;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::accounts::{AccountService, LoginRequest, RegisterRequest};
use crate::error::AccountError;
use crate::types::SessionToken;

pub type AppState = Arc<AccountService>;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/guest", post(guest_login))
        .route("/api/storage", get(resolve_storage))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

type ApiError = (StatusCode, Json<Value>);

/// Map a core error to the wire representation: a status code plus a
/// (kind, message) pair.
///
/// Tampered and expired tokens both come out as a generic authentication
/// failure so the response does not reveal which case occurred.
fn error_response(err: AccountError) -> ApiError {
    let (status, kind) = match &err {
        AccountError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
        AccountError::MissingFields => (StatusCode::BAD_REQUEST, "missing_fields"),
        AccountError::DuplicateEmail => (StatusCode::BAD_REQUEST, "duplicate_email"),
        AccountError::UnknownIdentity => (StatusCode::UNAUTHORIZED, "unknown_identity"),
        AccountError::BadCredentials => (StatusCode::UNAUTHORIZED, "bad_credentials"),
        AccountError::InvalidToken(_) | AccountError::Expired => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": "unauthenticated",
                    "message": "Authentication failed",
                })),
            );
        }
        AccountError::StoreUnavailable(_)
        | AccountError::ProvisioningFailed(_)
        | AccountError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error"),
    };

    (
        status,
        Json(serde_json::json!({
            "error": kind,
            "message": err.to_string(),
        })),
    )
}

async fn health_check() -> Result<Json<Value>, StatusCode> {
    Ok(Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state.register(payload).await.map_err(error_response)?;

    Ok(Json(serde_json::json!({
        "status": "registered",
        "email": outcome.email,
    })))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let session = state.login(payload).await.map_err(error_response)?;

    Ok(Json(serde_json::json!({
        "tenant": session.tenant,
        "token": session.token,
        "expires_in": session.expires_in,
    })))
}

async fn guest_login(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let session = state.guest_login().await.map_err(error_response)?;

    Ok(Json(serde_json::json!({
        "tenant": session.tenant,
        "token": session.token,
        "expires_in": session.expires_in,
    })))
}

/// Protected route: resolves the caller's storage pointer from the bearer
/// token alone.
async fn resolve_storage(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let token = bearer_token(&headers).ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": "unauthenticated",
                "message": "Authentication failed",
            })),
        )
    })?;

    let pointer = state.resolve_storage(&token).map_err(error_response)?;

    Ok(Json(serde_json::json!({
        "storage_pointer": pointer,
    })))
}

fn bearer_token(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(SessionToken::new)
}
