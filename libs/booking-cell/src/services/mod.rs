pub mod catalogue;
pub mod reservation;
pub mod whatsapp;
