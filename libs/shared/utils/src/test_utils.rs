use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::{AppConfig, DEFAULT_SLOT_CATALOGUE};

use crate::session::issue_token;

pub struct TestConfig {
    pub session_secret: String,
    pub store_url: String,
    pub store_api_key: String,
    pub admin_password_hash: String,
    pub shop_whatsapp: String,
    pub slot_catalogue: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            session_secret: "test-secret-key-for-session-validation-must-be-long-enough"
                .to_string(),
            store_url: "http://localhost:54321".to_string(),
            store_api_key: "test-api-key".to_string(),
            admin_password_hash: String::new(),
            shop_whatsapp: "50255551234".to_string(),
            slot_catalogue: DEFAULT_SLOT_CATALOGUE.to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_store_url(url: &str) -> Self {
        Self {
            store_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            store_url: self.store_url.clone(),
            store_api_key: self.store_api_key.clone(),
            session_secret: self.session_secret.clone(),
            admin_password_hash: self.admin_password_hash.clone(),
            shop_whatsapp: self.shop_whatsapp.clone(),
            slot_catalogue: self.slot_catalogue.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct SessionTestUtils;

impl SessionTestUtils {
    pub fn create_admin_token(secret: &str) -> String {
        let (token, _) = issue_token("admin", "admin", secret)
            .expect("test token issuance should not fail");
        token
    }

    /// Token with the right shape and signature but an exp in the past.
    pub fn create_expired_token(secret: &str) -> String {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use hmac::{Hmac, Mac};
        use sha2::Sha256;

        let past = Utc::now() - Duration::hours(2);
        let header = json!({ "alg": "HS256", "typ": "JWT" });
        let claims = json!({
            "sub": "admin",
            "role": "admin",
            "iat": (past - Duration::hours(1)).timestamp(),
            "exp": past.timestamp()
        });

        let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string());
        let claims_b64 = URL_SAFE_NO_PAD.encode(claims.to_string());
        let signing_input = format!("{}.{}", header_b64, claims_b64);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{}.{}", signing_input, signature)
    }

    pub fn create_invalid_signature_token() -> String {
        Self::create_admin_token("wrong-secret")
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned store documents for wiremock-backed tests.
pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn appointment_doc(
        id: &str,
        client_name: &str,
        phone: &str,
        date: &str,
        time_slot: &str,
        status: &str,
    ) -> Value {
        json!({
            "id": id,
            "client_name": client_name,
            "phone": phone,
            "date": date,
            "time_slot": time_slot,
            "status": status,
            "cancellation_reason": null,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn confirmed_appointment(date: &str, time_slot: &str) -> Value {
        Self::appointment_doc(
            &Uuid::new_v4().to_string(),
            "Test Client",
            "5555-5555",
            date,
            time_slot,
            "confirmed",
        )
    }

    pub fn cancelled_appointment(date: &str, time_slot: &str) -> Value {
        let mut doc = Self::appointment_doc(
            &Uuid::new_v4().to_string(),
            "Test Client",
            "5555-5555",
            date,
            time_slot,
            "cancelled",
        );
        doc["cancellation_reason"] = json!("cancelled by administrator");
        doc
    }

    pub fn unique_violation_body() -> Value {
        json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"appointments_slot_confirmed_idx\""
        })
    }
}
