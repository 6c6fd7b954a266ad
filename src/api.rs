use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ApiConfig, NetworkConfig};
use crate::mapper::{self, PanchangamResponse};
use crate::model::{Location, PanchangamDay};
use crate::orchestrator::FetchError;
use crate::traits::PanchangamSource;

/// Failures of a remote almanac call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),
    #[error("request timed out")]
    TimedOut,
    #[error("server returned HTTP {status}")]
    Http { status: u16 },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("API key rejected")]
    Unauthorized,
    #[error("rate limited, try again later")]
    RateLimited,
    #[error("no API key configured")]
    MissingCredential,
    #[error("service unavailable")]
    ServerUnavailable,
}

impl ApiError {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
            StatusCode::SERVICE_UNAVAILABLE => ApiError::ServerUnavailable,
            other => ApiError::Http { status: other.as_u16() },
        }
    }

    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::TimedOut
        } else if err.is_builder() {
            ApiError::MalformedRequest(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::NetworkUnreachable(err.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// HTTP client for the Panchangam service.
#[derive(Clone, Debug)]
pub struct PanchangamApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    client_type: String,
}

impl PanchangamApiClient {
    /// Create a new API client with configurable timeouts.
    pub fn new(api: &ApiConfig, network_config: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(network_config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(network_config.connect_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: api.resolved_base_url().to_string(),
            api_key: api.credential().map(str::to_string),
            client_type: api.client_type.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let key = self.api_key.as_deref().ok_or(ApiError::MissingCredential)?;
        let url = reqwest::Url::parse_with_params(&format!("{}{}", self.base_url, path), query)
            .map_err(|e| ApiError::MalformedRequest(e.to_string()))?;
        debug!(%url, "Requesting");

        let response = self
            .client
            .get(url.clone())
            .header("X-API-Key", key)
            .header("X-Client-Type", &self.client_type)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "API returned error status");
            return Err(ApiError::from_status(status));
        }

        let body = response.bytes().await.map_err(ApiError::from_transport)?;
        serde_json::from_slice(&body).map_err(|e| {
            warn!(%url, error = %e, "Failed to decode response");
            ApiError::Decode(e.to_string())
        })
    }

    fn location_query(location: &Location) -> [(&'static str, String); 3] {
        [
            ("lat", location.latitude().to_string()),
            ("lng", location.longitude().to_string()),
            ("timezone", location.timezone().to_string()),
        ]
    }

    /// Fetch the raw response for one day.
    pub async fn fetch_daily_raw(&self, date: NaiveDate, location: &Location) -> Result<PanchangamResponse, ApiError> {
        let mut query = vec![("date", date.format("%Y-%m-%d").to_string())];
        query.extend(Self::location_query(location));
        self.get("/api/panchangam/daily", &query).await
    }

    /// Fetch and map one day.
    pub async fn fetch_daily(&self, date: NaiveDate, location: &Location) -> Result<PanchangamDay, FetchError> {
        let raw = self.fetch_daily_raw(date, location).await?;
        Ok(mapper::map(&raw, location)?)
    }

    /// Fetch seven days from `start`. Days that cannot be mapped are skipped.
    pub async fn fetch_weekly(&self, start: NaiveDate, location: &Location) -> Result<Vec<PanchangamDay>, ApiError> {
        let mut query = vec![("startDate", start.format("%Y-%m-%d").to_string())];
        query.extend(Self::location_query(location));
        let raw: Vec<PanchangamResponse> = self.get("/api/panchangam/weekly", &query).await?;

        Ok(raw
            .iter()
            .filter_map(|day| match mapper::map(day, location) {
                Ok(mapped) => Some(mapped),
                Err(e) => {
                    warn!(date = %day.date, error = %e, "Skipping unmappable day");
                    None
                }
            })
            .collect())
    }

    /// Whether the service reports itself healthy.
    pub async fn check_health(&self) -> Result<bool, ApiError> {
        let health: HealthResponse = self.get("/api/panchangam/health", &[]).await?;
        Ok(health.status.eq_ignore_ascii_case("UP") || health.status.eq_ignore_ascii_case("OK"))
    }
}

impl PanchangamSource for PanchangamApiClient {
    async fn fetch_day(&self, date: NaiveDate, location: &Location) -> Result<PanchangamDay, FetchError> {
        self.fetch_daily(date, location).await
    }
}
