// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Blocking client for the OpenSky `/api/states/all` endpoint.
//!
//! One call fetches the state vectors inside a bounding box. Failures are
//! typed so callers can tell apart an HTTP status error, a transport fault,
//! a malformed body, and a response that carried no states at all.
//!
//! Credentials go out as a Basic Authorization header, never interpolated
//! into the request URL. Transport faults and 429/5xx statuses are retried
//! a bounded number of times with exponential backoff; client errors fail
//! immediately.

use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::{StateError, StateVector};

/// Query region in geographic degrees: `lamin`/`lamax` bound latitude,
/// `lomin`/`lomax` bound longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lamin: f64,
    pub lomin: f64,
    pub lamax: f64,
    pub lomax: f64,
}

/// Errors for a malformed bounding box.
#[derive(Debug, Error)]
pub enum BoundsError {
    #[error("latitude {0} outside [-90, 90]")]
    Latitude(f64),

    #[error("longitude {0} outside [-180, 180]")]
    Longitude(f64),

    #[error("minimum corner ({lamin}, {lomin}) is not south-west of maximum ({lamax}, {lomax})")]
    Order {
        lamin: f64,
        lomin: f64,
        lamax: f64,
        lomax: f64,
    },
}

impl BoundingBox {
    /// Build a validated bounding box.
    pub fn new(lamin: f64, lomin: f64, lamax: f64, lomax: f64) -> Result<Self, BoundsError> {
        for lat in [lamin, lamax] {
            if !(-90.0..=90.0).contains(&lat) || lat.is_nan() {
                return Err(BoundsError::Latitude(lat));
            }
        }
        for lon in [lomin, lomax] {
            if !(-180.0..=180.0).contains(&lon) || lon.is_nan() {
                return Err(BoundsError::Longitude(lon));
            }
        }
        if lamin >= lamax || lomin >= lomax {
            return Err(BoundsError::Order {
                lamin,
                lomin,
                lamax,
                lomax,
            });
        }

        Ok(Self {
            lamin,
            lomin,
            lamax,
            lomax,
        })
    }
}

/// API username and password for authenticated (higher rate limit) access.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Client configuration, injected at construction; no global state.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, scheme included.
    pub base_url: String,
    /// Optional Basic auth credentials.
    pub credentials: Option<Credentials>,
    /// Per-request timeout covering connect through body read.
    pub timeout: Duration,
    /// Total attempts per fetch, including the first.
    pub retry_attempts: u32,
    /// Backoff before the first retry; doubles per subsequent retry.
    pub retry_backoff: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://opensky-network.org".to_string(),
            credentials: None,
            timeout: Duration::from_secs(10),
            retry_attempts: 3,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// Errors at the fetch boundary, distinguished so callers can branch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response contained no state vectors")]
    NoData,

    #[error("state vector rejected: {0}")]
    State(#[from] StateError),
}

impl FetchError {
    /// Whether a retry could plausibly succeed. Rate limiting and server
    /// errors are transient; client errors and malformed bodies are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::HttpStatus(status) => *status == 429 || *status >= 500,
            Self::Decode(_) | Self::NoData | Self::State(_) => false,
        }
    }
}

/// Wire shape of the `/api/states/all` response. `states` is null when the
/// network has nothing for the region.
#[derive(Debug, Deserialize)]
struct StatesResponse {
    #[allow(dead_code, reason = "retained for responses that carry it")]
    time: Option<i64>,
    states: Option<Vec<Vec<serde_json::Value>>>,
}

/// Blocking OpenSky API client.
#[derive(Debug)]
pub struct OpenSkyClient {
    http: reqwest::blocking::Client,
    config: ClientConfig,
}

impl OpenSkyClient {
    /// Build a client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { http, config })
    }

    /// Fetch all state vectors inside `bbox`, retrying transient failures.
    ///
    /// An empty vector means the request succeeded and no aircraft are in
    /// the region; a response without a `states` array is
    /// [`FetchError::NoData`].
    pub fn get_states(&self, bbox: &BoundingBox) -> Result<Vec<StateVector>, FetchError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_get_states(bbox) {
                Ok(states) => {
                    info!("fetched {} state vectors for {bbox:?}", states.len());
                    return Ok(states);
                }
                Err(err) if attempt < self.config.retry_attempts && err.is_retryable() => {
                    let backoff = self.config.retry_backoff * 2_u32.pow(attempt - 1);
                    warn!(
                        "state fetch attempt {attempt}/{} failed ({err}), retrying in {backoff:?}",
                        self.config.retry_attempts
                    );
                    thread::sleep(backoff);
                }
                Err(err) => {
                    warn!("state fetch failed: {err}");
                    return Err(err);
                }
            }
        }
    }

    fn try_get_states(&self, bbox: &BoundingBox) -> Result<Vec<StateVector>, FetchError> {
        let url = format!("{}/api/states/all", self.config.base_url);
        debug!("GET {url} lamin={} lomin={} lamax={} lomax={}",
            bbox.lamin, bbox.lomin, bbox.lamax, bbox.lomax);

        let mut request = self.http.get(&url).query(&[
            ("lamin", bbox.lamin),
            ("lomin", bbox.lomin),
            ("lamax", bbox.lamax),
            ("lomax", bbox.lomax),
        ]);
        if let Some(credentials) = &self.config.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.text()?;
        let parsed: StatesResponse = serde_json::from_str(&body)?;
        let raw = parsed.states.ok_or(FetchError::NoData)?;

        raw.iter()
            .map(|record| StateVector::from_raw(record).map_err(FetchError::from))
            .collect()
    }
}
