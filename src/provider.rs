// Hotel search provider: the external HTTP API that returns raw hotel records
// for a latitude/longitude/radius query.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::HotelError;
use crate::hotel::{HotelRecord, ProviderPayload};

// Longest slice of an error body kept in ApiResponse messages
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    // Meters
    pub radius: u32,
}

#[async_trait]
pub trait HotelSearchProvider: Send + Sync + 'static {
    // Hotels near the requested point, with records lacking coordinates dropped
    async fn search(&self, request: &SearchRequest) -> Result<Vec<HotelRecord>, HotelError>;
}

pub struct HttpHotelProvider {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpHotelProvider {
    pub fn new(config: &ClientConfig) -> Result<Self, HotelError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| HotelError::Config(format!("cannot build HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            HotelError::Config(format!("invalid base URL '{}': {}", config.base_url, e))
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn build_url(&self, request: &SearchRequest) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &request.latitude.to_string())
            .append_pair("longitude", &request.longitude.to_string())
            .append_pair("radius", &request.radius.to_string());
        url
    }
}

#[async_trait]
impl HotelSearchProvider for HttpHotelProvider {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<HotelRecord>, HotelError> {
        let url = self.build_url(request);
        debug!(%url, "Requesting nearby hotels");

        let mut builder = self.client.get(url);
        if let Some(api_key) = &self.api_key {
            builder = builder.header("x-api-key", api_key);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown").to_string()
            } else {
                body.chars().take(MAX_ERROR_BODY_CHARS).collect()
            };
            warn!(status = status.as_u16(), "Hotel provider returned an error");
            return Err(HotelError::ApiResponse {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: Bytes = response.bytes().await?;
        let payload: ProviderPayload = serde_json::from_slice(&body)?;
        Ok(payload.into_records())
    }
}
