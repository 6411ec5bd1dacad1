use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Errors surfaced by the document store. `UniqueViolation` is kept distinct
/// so callers can map a constraint hit on insert to a domain conflict.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("store rejected credentials: {0}")]
    Unauthorized(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("store request failed ({status}): {body}")]
    Request { status: u16, body: String },

    #[error("failed to reach store: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected store payload: {0}")]
    Decode(String),
}

/// Thin client for a PostgREST-style document store. The whole persistence
/// surface of the application is the four primitives below: insert, select,
/// update and delete on one collection.
pub struct StoreClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl StoreClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.store_url.clone(),
            api_key: config.store_api_key.clone(),
        }
    }

    fn headers(&self, return_representation: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if return_representation {
            headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        }

        headers
    }

    async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        return_representation: bool,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Store request {} {}", method, url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.headers(return_representation));

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Store error ({}): {}", status, error_text);

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    StoreError::Unauthorized(error_text)
                }
                StatusCode::NOT_FOUND => StoreError::NotFound(error_text),
                StatusCode::CONFLICT => StoreError::UniqueViolation(error_text),
                _ => StoreError::Request {
                    status: status.as_u16(),
                    body: error_text,
                },
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    fn collection_path(collection: &str, filters: &[(&str, &str)], order: Option<&str>) -> String {
        let mut parts: Vec<String> = filters
            .iter()
            .map(|(field, value)| format!("{}=eq.{}", field, urlencoding::encode(value)))
            .collect();

        if let Some(order) = order {
            parts.push(format!("order={}", order));
        }

        if parts.is_empty() {
            format!("/rest/v1/{}", collection)
        } else {
            format!("/rest/v1/{}?{}", collection, parts.join("&"))
        }
    }

    /// Insert one document; the store assigns id and created_at. Returns the
    /// stored representation.
    pub async fn insert<T>(&self, collection: &str, fields: Value) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", collection);
        let rows: Vec<T> = self.request(Method::POST, &path, Some(fields), true).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no representation".to_string()))
    }

    /// Query documents by equality filters, optionally ordered
    /// (PostgREST syntax, e.g. `"date.asc,time_slot.asc"`).
    pub async fn select<T>(
        &self,
        collection: &str,
        filters: &[(&str, &str)],
        order: Option<&str>,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let path = Self::collection_path(collection, filters, order);
        self.request(Method::GET, &path, None, false).await
    }

    /// Patch one document by id. Returns the updated representations; an
    /// empty result means no document matched the id.
    pub async fn update<T>(
        &self,
        collection: &str,
        id: &str,
        partial: Value,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let path = Self::collection_path(collection, &[("id", id)], None);
        self.request(Method::PATCH, &path, Some(partial), true).await
    }

    /// Delete one document by id (escape hatch only). Returns the deleted
    /// representations; an empty result means no document matched.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<Vec<Value>, StoreError> {
        let path = Self::collection_path(collection, &[("id", id)], None);
        self.request(Method::DELETE, &path, None, true).await
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
