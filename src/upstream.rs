//! HTTP client for the reservation gateway.
//!
//! The reservation, ticket and price services all live behind one gateway
//! base URL. One shared [`reqwest::Client`] carries the configured
//! per-request timeout; a timed-out or aborted request surfaces as a
//! transport failure and is never retried here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::error::LookupError;
use crate::pipeline::{PriceLookup, ReservationLookup, SegmentQuery, TicketLookup};

/// Gateway client implementing all three pipeline lookups.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("farewatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, LookupError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        read_body(response).await
    }
}

async fn read_body(response: reqwest::Response) -> Result<String, LookupError> {
    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Status(status.as_u16()));
    }

    response
        .text()
        .await
        .map_err(|e| LookupError::Transport(e.to_string()))
}

fn decode_json(body: &str) -> Result<Value, LookupError> {
    serde_json::from_str(body).map_err(|e| LookupError::Body(e.to_string()))
}

#[async_trait]
impl ReservationLookup for UpstreamClient {
    async fn fetch_reservation(&self, pnr: &str) -> Result<String, LookupError> {
        // record locators come from callers, so they are path-escaped
        let url = format!("{}/pnrs/{}", self.base_url, urlencoding::encode(pnr));
        self.get_text(&url).await
    }
}

#[async_trait]
impl TicketLookup for UpstreamClient {
    async fn fetch_ticket(&self, ticket_number: &str) -> Result<Value, LookupError> {
        let url = format!("{}/tickets/{}", self.base_url, ticket_number);
        let body = self.get_text(&url).await?;
        decode_json(&body)
    }
}

#[async_trait]
impl PriceLookup for UpstreamClient {
    async fn fetch_prices(&self, segments: &[SegmentQuery]) -> Result<Value, LookupError> {
        let url = format!("{}/price", self.base_url);
        debug!("POST {url} with {} segments", segments.len());

        let response = self
            .client
            .post(&url)
            .json(segments)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        let body = read_body(response).await?;
        decode_json(&body)
    }
}
