use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{StoreClient, StoreError};

use crate::models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, BookingError,
    APPOINTMENTS_COLLECTION, DEFAULT_CANCELLATION_REASON,
};
use crate::services::catalogue::SlotCatalogue;

/// Availability and reservation operations over the remote appointment
/// collection. The store is the single source of truth; this service keeps
/// no state of its own beyond the configured slot catalogue.
pub struct ReservationService {
    store: Arc<StoreClient>,
    catalogue: SlotCatalogue,
}

impl ReservationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: Arc::new(StoreClient::new(config)),
            catalogue: SlotCatalogue::from_config(&config.slot_catalogue),
        }
    }

    pub fn catalogue(&self) -> &SlotCatalogue {
        &self.catalogue
    }

    /// Labels occupied on `date`: every appointment at that date whose
    /// status is not cancelled. An empty day yields an empty list.
    pub async fn list_occupied_slots(&self, date: &str) -> Result<Vec<String>, BookingError> {
        validate_date(date)?;
        debug!("Loading occupied slots for {}", date);

        let appointments: Vec<Appointment> = self
            .store
            .select(APPOINTMENTS_COLLECTION, &[("date", date)], None)
            .await?;

        Ok(appointments
            .into_iter()
            .filter(Appointment::occupies_slot)
            .map(|appointment| appointment.time_slot)
            .collect())
    }

    /// True iff at least one confirmed appointment exists at (date, slot).
    /// Fetches every document at the pair and filters status client-side;
    /// cancelled documents never block a slot.
    pub async fn is_slot_taken(&self, date: &str, time_slot: &str) -> Result<bool, BookingError> {
        let appointments: Vec<Appointment> = self
            .store
            .select(
                APPOINTMENTS_COLLECTION,
                &[("date", date), ("time_slot", time_slot)],
                None,
            )
            .await?;

        Ok(appointments.iter().any(|a| a.occupies_slot()))
    }

    /// Reserve (date, time_slot) for a client. Check-then-write: the
    /// availability pre-check gives a fast, friendly conflict answer, and
    /// the store's partial unique index on confirmed (date, time_slot) is
    /// the authoritative guard. A concurrent insert that slips past the
    /// pre-check still comes back as `SlotTaken`, never as a double booking.
    pub async fn create_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, BookingError> {
        let client_name = request.client_name.trim();
        if client_name.is_empty() {
            return Err(BookingError::Validation("client name must not be empty".into()));
        }
        let phone = request.phone.trim();
        if phone.is_empty() {
            return Err(BookingError::Validation("phone must not be empty".into()));
        }
        validate_date(&request.date)?;
        if !self.catalogue.contains(&request.time_slot) {
            return Err(BookingError::UnknownSlot(request.time_slot));
        }

        if self.is_slot_taken(&request.date, &request.time_slot).await? {
            info!(
                "Rejecting booking for {} {}: slot already taken",
                request.date, request.time_slot
            );
            return Err(BookingError::SlotTaken);
        }

        let fields = json!({
            "client_name": client_name,
            "phone": phone,
            "date": request.date,
            "time_slot": request.time_slot,
            "status": AppointmentStatus::Confirmed.to_string(),
        });

        let appointment: Appointment = match self
            .store
            .insert(APPOINTMENTS_COLLECTION, fields)
            .await
        {
            Ok(appointment) => appointment,
            Err(StoreError::UniqueViolation(detail)) => {
                warn!(
                    "Lost slot race for {} {}: {}",
                    request.date, request.time_slot, detail
                );
                return Err(BookingError::SlotTaken);
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            "Booked appointment {} for {} at {} {}",
            appointment.id, appointment.client_name, appointment.date, appointment.time_slot
        );
        Ok(appointment)
    }

    /// Mark an appointment cancelled and record the reason. Cancelling an
    /// already-cancelled appointment succeeds and rewrites status/reason;
    /// the document is kept for history, never removed here.
    pub async fn cancel_appointment(
        &self,
        id: Uuid,
        reason: Option<String>,
    ) -> Result<Appointment, BookingError> {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_CANCELLATION_REASON.to_string());

        let partial = json!({
            "status": AppointmentStatus::Cancelled.to_string(),
            "cancellation_reason": reason,
        });

        let updated: Vec<Appointment> = self
            .store
            .update(APPOINTMENTS_COLLECTION, &id.to_string(), partial)
            .await?;

        let appointment = updated.into_iter().next().ok_or(BookingError::NotFound)?;

        info!("Cancelled appointment {}", appointment.id);
        Ok(appointment)
    }

    /// Destructive removal. Escape hatch only; normal flows cancel instead.
    pub async fn delete_appointment(&self, id: Uuid) -> Result<(), BookingError> {
        let deleted = self
            .store
            .delete(APPOINTMENTS_COLLECTION, &id.to_string())
            .await?;

        if deleted.is_empty() {
            return Err(BookingError::NotFound);
        }

        warn!("Deleted appointment {} permanently", id);
        Ok(())
    }

    /// Every appointment in the collection, store-ordered by (date,
    /// time_slot). The label ordering is textual; consumers that need
    /// chronological order re-sort with the aggregation comparator.
    pub async fn list_all_appointments(&self) -> Result<Vec<Appointment>, BookingError> {
        let appointments = self
            .store
            .select(
                APPOINTMENTS_COLLECTION,
                &[],
                Some("date.asc,time_slot.asc"),
            )
            .await?;

        Ok(appointments)
    }
}

/// Dates must be zero-padded ISO `YYYY-MM-DD`: the grouping and past/future
/// logic compares them lexicographically, which is only valid in that form.
/// chrono parses "2024-6-1" leniently, so require an exact round-trip.
fn validate_date(date: &str) -> Result<(), BookingError> {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) if parsed.format("%Y-%m-%d").to_string() == date => Ok(()),
        _ => Err(BookingError::InvalidDate(date.to_string())),
    }
}
