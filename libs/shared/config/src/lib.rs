use std::env;
use tracing::warn;

/// Default slot catalogue: 30-minute cuts from 09:00 AM with a lunch gap
/// between 12:30 PM and 02:00 PM, last slot 11:30 PM.
pub const DEFAULT_SLOT_CATALOGUE: &str = "09:00 AM,09:30 AM,10:00 AM,10:30 AM,\
11:00 AM,11:30 AM,12:00 PM,12:30 PM,02:00 PM,02:30 PM,03:00 PM,03:30 PM,\
04:00 PM,04:30 PM,05:00 PM,05:30 PM,06:00 PM,06:30 PM,07:00 PM,07:30 PM,\
08:00 PM,08:30 PM,09:00 PM,09:30 PM,10:00 PM,10:30 PM,11:00 PM,11:30 PM";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_api_key: String,
    pub session_secret: String,
    pub admin_password_hash: String,
    pub shop_whatsapp: String,
    pub slot_catalogue: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_url: env::var("STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("STORE_URL not set, using empty value");
                    String::new()
                }),
            store_api_key: env::var("STORE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("STORE_API_KEY not set, using empty value");
                    String::new()
                }),
            session_secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SESSION_SECRET not set, using empty value");
                    String::new()
                }),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_PASSWORD_HASH not set, admin login will be rejected");
                    String::new()
                }),
            shop_whatsapp: env::var("SHOP_WHATSAPP")
                .unwrap_or_else(|_| {
                    warn!("SHOP_WHATSAPP not set, booking responses will omit the chat link");
                    String::new()
                }),
            slot_catalogue: env::var("SLOT_CATALOGUE")
                .unwrap_or_else(|_| DEFAULT_SLOT_CATALOGUE.to_string()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.store_url.is_empty()
            && !self.store_api_key.is_empty()
            && !self.session_secret.is_empty()
    }
}
