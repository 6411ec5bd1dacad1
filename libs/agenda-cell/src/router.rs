use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::admin_auth_middleware;

use crate::handlers;

/// Admin surface: everything requires a valid admin session.
pub fn agenda_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/agenda", get(handlers::get_agenda))
        .route("/appointments", get(handlers::list_appointments))
        .route(
            "/appointments/{appointment_id}/cancel",
            post(handlers::cancel_appointment),
        )
        .route(
            "/appointments/{appointment_id}",
            delete(handlers::delete_appointment),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    Router::new().merge(protected_routes).with_state(state)
}
