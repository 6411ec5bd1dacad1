use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{BookAppointmentRequest, BookingError, DayQuery, SlotAvailability};
use crate::services::reservation::ReservationService;
use crate::services::whatsapp;

/// Full day view for the booking surface: every catalogue slot in order
/// with its occupancy flag, so a client can render the grid directly.
#[axum::debug_handler]
pub async fn get_day_schedule(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<DayQuery>,
) -> Result<Json<Value>, AppError> {
    let service = ReservationService::new(&state);

    let occupied = service
        .list_occupied_slots(&params.date)
        .await
        .map_err(|e| match e {
            BookingError::InvalidDate(d) => AppError::BadRequest(format!("Invalid date: {}", d)),
            BookingError::Store(msg) => AppError::Store(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    let slots: Vec<SlotAvailability> = service
        .catalogue()
        .labels()
        .iter()
        .map(|label| SlotAvailability {
            time_slot: label.clone(),
            taken: occupied.iter().any(|taken| taken == label),
        })
        .collect();

    Ok(Json(json!({
        "date": params.date,
        "slots": slots
    })))
}

/// Occupied labels only, the booking surface's disable-list.
#[axum::debug_handler]
pub async fn get_occupied_slots(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<DayQuery>,
) -> Result<Json<Value>, AppError> {
    let service = ReservationService::new(&state);

    let occupied = service
        .list_occupied_slots(&params.date)
        .await
        .map_err(|e| match e {
            BookingError::InvalidDate(d) => AppError::BadRequest(format!("Invalid date: {}", d)),
            BookingError::Store(msg) => AppError::Store(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "date": params.date,
        "occupied": occupied
    })))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ReservationService::new(&state);

    let appointment = service.create_appointment(request).await.map_err(|e| match e {
        BookingError::SlotTaken => {
            AppError::Conflict("Slot no longer available, someone may have taken it".to_string())
        }
        BookingError::UnknownSlot(label) => {
            AppError::BadRequest(format!("Unknown time slot: {}", label))
        }
        BookingError::InvalidDate(d) => AppError::BadRequest(format!("Invalid date: {}", d)),
        BookingError::Validation(msg) => AppError::BadRequest(msg),
        BookingError::Store(msg) => AppError::Store(msg),
        _ => AppError::Internal(e.to_string()),
    })?;

    // Best-effort handoff: the reservation is durable whether or not the
    // client ever opens this link.
    let whatsapp_link = whatsapp::handoff_link(&state.shop_whatsapp, &appointment);

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "whatsapp_link": whatsapp_link,
        "message": "Appointment booked successfully"
    })))
}
