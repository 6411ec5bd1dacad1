use crate::models::Appointment;

/// Deep link handing the fresh reservation over to the shop's WhatsApp.
/// Pure string construction: it cannot fail, and opening it is entirely the
/// caller's (best-effort) concern; the reservation is already durable.
pub fn handoff_link(shop_number: &str, appointment: &Appointment) -> Option<String> {
    if shop_number.is_empty() {
        return None;
    }

    let message = format!(
        "Hola, soy *{}*. 👋\nAcabo de reservar mi corte en la web para el día *{}* a las *{}*.\nMi número es: {}. ¡Nos vemos! 💈",
        appointment.client_name, appointment.date, appointment.time_slot, appointment.phone,
    );

    Some(format!(
        "https://wa.me/{}?text={}",
        shop_number,
        urlencoding::encode(&message)
    ))
}
