pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, BookingError,
    CancelAppointmentRequest, SlotAvailability,
};
pub use router::booking_routes;

pub mod api {
    pub use crate::services::catalogue::SlotCatalogue;
    pub use crate::services::reservation::ReservationService;
    pub use crate::services::whatsapp::handoff_link;
}
