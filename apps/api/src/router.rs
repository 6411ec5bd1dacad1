use std::sync::Arc;

use axum::{routing::get, Router};

use agenda_cell::router::agenda_routes;
use auth_cell::router::auth_routes;
use booking_cell::router::booking_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "JBarber booking API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/appointments", booking_routes(state.clone()))
        .nest("/admin", agenda_routes(state))
}
