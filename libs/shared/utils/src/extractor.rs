use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::session::AdminSession;

use crate::session::validate_token;

/// Middleware guarding the admin surface: requires a valid, unexpired
/// admin session token.
pub async fn admin_auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    let token = &auth_value[7..];

    let session = validate_token(token, &config.session_secret).map_err(AppError::Auth)?;

    if session.role != "admin" {
        return Err(AppError::Auth("Admin session required".to_string()));
    }

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// Extract the validated session from request extensions.
pub fn extract_session<B>(request: &Request<B>) -> Result<AdminSession, AppError> {
    request
        .extensions()
        .get::<AdminSession>()
        .cloned()
        .ok_or_else(|| AppError::Auth("Session not found in request extensions".to_string()))
}
