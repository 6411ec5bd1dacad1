use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_database::StoreError;

/// Collection holding every appointment document.
pub const APPOINTMENTS_COLLECTION: &str = "appointments";

/// Reason recorded when an administrator cancels without giving one.
pub const DEFAULT_CANCELLATION_REASON: &str = "cancelled by administrator";

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// One reservation as stored in the document store. `date` is a zero-padded
/// ISO `YYYY-MM-DD` string and is compared lexicographically; `time_slot` is
/// the display label of a catalogue slot, never a numeric time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub client_name: String,
    pub phone: String,
    pub date: String,
    pub time_slot: String,
    pub status: AppointmentStatus,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// A confirmed appointment occupies its slot; a cancelled one does not.
    pub fn occupies_slot(&self) -> bool {
        self.status == AppointmentStatus::Confirmed
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Confirmed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub client_name: String,
    pub phone: String,
    pub date: String,
    pub time_slot: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: String,
}

/// One catalogue entry with its occupancy flag for a given day, in
/// catalogue order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub time_slot: String,
    pub taken: bool,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum BookingError {
    #[error("Slot already has a confirmed appointment")]
    SlotTaken,

    #[error("Appointment not found")]
    NotFound,

    #[error("Unknown time slot: {0}")]
    UnknownSlot(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            // The partial unique index on (date, time_slot) for confirmed
            // documents reports attempts to double-book as a 409.
            StoreError::UniqueViolation(_) => BookingError::SlotTaken,
            StoreError::NotFound(msg) => BookingError::Store(msg),
            other => BookingError::Store(other.to_string()),
        }
    }
}
