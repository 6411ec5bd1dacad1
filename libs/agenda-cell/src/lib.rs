pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{AgendaCounts, AgendaView, DateGroup, SearchCounts};
pub use router::agenda_routes;
pub use services::aggregation;
