use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

/// Public booking surface: no authentication, just what the storefront
/// needs to read a day's availability and submit a reservation.
pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/schedule", get(handlers::get_day_schedule))
        .route("/occupied", get(handlers::get_occupied_slots))
        .route("/", post(handlers::book_appointment))
        .with_state(state)
}
