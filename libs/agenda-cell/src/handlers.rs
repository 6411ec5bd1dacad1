use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Local;
use serde_json::{json, Value};
use uuid::Uuid;

use booking_cell::api::ReservationService;
use booking_cell::{BookingError, CancelAppointmentRequest};
use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{AgendaQuery, AgendaView};
use crate::services::aggregation::{agenda_counts, sort_appointments};

fn map_load_error(e: BookingError) -> AppError {
    match e {
        BookingError::Store(msg) => AppError::Store(msg),
        other => AppError::Internal(other.to_string()),
    }
}

/// The admin screen in one response: sorted, grouped by date, partitioned
/// into upcoming and past around "today", with headline counts and, when
/// `q` is given, the search view over name and phone.
#[axum::debug_handler]
pub async fn get_agenda(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<AgendaQuery>,
) -> Result<Json<Value>, AppError> {
    let service = ReservationService::new(&state);

    let appointments = service
        .list_all_appointments()
        .await
        .map_err(map_load_error)?;

    let today = params
        .today
        .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string());

    tracing::debug!(
        "Building agenda view over {} appointments (today {})",
        appointments.len(),
        today
    );

    let view = AgendaView::build(appointments, &today, params.q.as_deref());

    Ok(Json(json!(view)))
}

/// Flat sorted listing with counts, for exports and debugging.
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<AgendaQuery>,
) -> Result<Json<Value>, AppError> {
    let service = ReservationService::new(&state);

    let appointments = service
        .list_all_appointments()
        .await
        .map_err(map_load_error)?;

    let today = params
        .today
        .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string());

    let sorted = sort_appointments(appointments);
    let counts = agenda_counts(&sorted, &today);

    Ok(Json(json!({
        "appointments": sorted,
        "total": sorted.len(),
        "counts": counts
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ReservationService::new(&state);

    let appointment = service
        .cancel_appointment(appointment_id, request.reason)
        .await
        .map_err(|e| match e {
            BookingError::NotFound => AppError::NotFound("Appointment not found".to_string()),
            BookingError::Store(msg) => AppError::Store(msg),
            other => AppError::Internal(other.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment cancelled, the slot is available again"
    })))
}

/// Destructive removal. Escape hatch, not part of the normal flows.
#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ReservationService::new(&state);

    service
        .delete_appointment(appointment_id)
        .await
        .map_err(|e| match e {
            BookingError::NotFound => AppError::NotFound("Appointment not found".to_string()),
            BookingError::Store(msg) => AppError::Store(msg),
            other => AppError::Internal(other.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment deleted"
    })))
}
