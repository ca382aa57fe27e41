//! HTTP adapters for the stats backend.
//!
//! Both adapters swallow every failure at their boundary and hand back
//! synthetic data instead, so callers never see an error.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::simulate;

/// One reading of the three tracked percentages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsSample {
    pub cpu: f64,
    pub ram: f64,
    pub disk: f64,
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
}

/// One bucket of a chart series. `time` is a display label, not sortable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub time: String,
    pub cpu: f64,
    pub ram: f64,
    pub disk: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Day,
    Week,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Day => "24h",
            Period::Week => "7d",
        }
    }

    pub fn bucket_count(self) -> usize {
        match self {
            Period::Day => 24,
            Period::Week => 7,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend answered {0}")]
    Status(StatusCode),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result of one stats poll: the sample and whether it came from the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsOutcome {
    pub sample: StatsSample,
    pub live: bool,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    stats_timeout: Duration,
    history_timeout: Option<Duration>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, stats_timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            stats_timeout,
            history_timeout: None,
        }
    }

    pub fn with_history_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.history_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the current stats. Never fails: any error yields a simulated sample.
    pub async fn fetch_current_stats(&self) -> StatsOutcome {
        match self.try_fetch_stats().await {
            Ok(sample) => StatsOutcome { sample, live: true },
            Err(e) => {
                tracing::warn!(error = %e, "backend not detected, switching to simulation mode");
                let sample = simulate::stats_sample(&mut rand::rng(), unix_now());
                StatsOutcome { sample, live: false }
            }
        }
    }

    /// Fetch a bucketed series for `period`. Never fails: any error yields a
    /// simulated series.
    pub async fn fetch_history(&self, period: Period) -> Vec<HistoryPoint> {
        match self.try_fetch_history(period).await {
            Ok(points) => points,
            Err(e) => {
                tracing::warn!(%period, error = %e, "history fetch failed, using simulated data");
                simulate::history(period, &chrono::Local::now(), &mut rand::rng())
            }
        }
    }

    async fn try_fetch_stats(&self) -> Result<StatsSample, ApiError> {
        let url = format!("{}/stats", self.base_url);
        let request = self.http.get(url).timeout(self.stats_timeout);
        self.get_json(request).await
    }

    async fn try_fetch_history(&self, period: Period) -> Result<Vec<HistoryPoint>, ApiError> {
        let url = format!("{}/history", self.base_url);
        let mut request = self.http.get(url).query(&[("period", period.as_str())]);
        if let Some(timeout) = self.history_timeout {
            request = request.timeout(timeout);
        }
        self.get_json(request).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}
