use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::session::TokenStatusResponse;
use shared_utils::session::{issue_token, validate_token};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    Ok(auth_value[7..].to_string())
}

/// Exchange the admin password for an expiring session token. The password
/// is only ever compared against the argon2 hash from configuration; no
/// credential is stored client-side beyond the issued token.
#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    if config.admin_password_hash.is_empty() {
        warn!("Admin login attempted but no password hash is configured");
        return Err(AppError::Auth("Admin login is not configured".to_string()));
    }

    let parsed_hash = PasswordHash::new(&config.admin_password_hash)
        .map_err(|_| AppError::Internal("Stored admin password hash is invalid".to_string()))?;

    Argon2::default()
        .verify_password(request.password.as_bytes(), &parsed_hash)
        .map_err(|_| {
            debug!("Admin login rejected: password mismatch");
            AppError::Auth("Invalid password".to_string())
        })?;

    let (token, expires_at) =
        issue_token("admin", "admin", &config.session_secret).map_err(AppError::Internal)?;

    info!("Admin session issued, expires at {}", expires_at);

    Ok(Json(json!({
        "token": token,
        "expires_at": expires_at
    })))
}

/// Report whether a presented session token is still valid.
#[axum::debug_handler]
pub async fn verify_session(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenStatusResponse>, AppError> {
    debug!("Verifying session token");

    let token = extract_bearer_token(&headers)?;

    match validate_token(&token, &config.session_secret) {
        Ok(session) => Ok(Json(TokenStatusResponse {
            valid: true,
            subject: Some(session.subject),
            role: Some(session.role),
        })),
        Err(_) => Ok(Json(TokenStatusResponse {
            valid: false,
            subject: None,
            role: None,
        })),
    }
}
