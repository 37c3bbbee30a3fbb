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

//! OpenSky state vector parsing.
//!
//! The `/api/states/all` endpoint returns each aircraft as a fixed-length
//! positional JSON array rather than an object. This module turns one such
//! array into a typed [`StateVector`], keeping missing values as `None`
//! instead of collapsing them into a string sentinel.

use serde_json::Value;
use thiserror::Error;

/// Number of positional fields in one raw state vector record.
pub const STATE_VECTOR_FIELDS: usize = 17;

/// Errors produced while parsing a raw state vector record.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state vector has {0} fields, expected {STATE_VECTOR_FIELDS}")]
    WrongArity(usize),

    #[error("invalid value for field '{field}': {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Origin of a reported position, as defined by the OpenSky REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSource {
    AdsB,
    Asterix,
    Mlat,
    Flarm,
}

impl PositionSource {
    fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::AdsB),
            1 => Some(Self::Asterix),
            2 => Some(Self::Mlat),
            3 => Some(Self::Flarm),
            _ => None,
        }
    }
}

/// One aircraft's reported identity/position/velocity snapshot.
///
/// Field order matches the positional order of the raw record. Every field
/// the API may omit is an `Option`; `icao24` and `origin_country` are always
/// present.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    /// ICAO 24-bit address (hex string), unique key for an aircraft.
    pub icao24: String,
    /// Callsign as broadcast, including any trailing padding.
    pub callsign: Option<String>,
    /// Country name inferred from the ICAO address.
    pub origin_country: String,
    /// Unix timestamp of the last position report.
    pub time_position: Option<i64>,
    /// Unix timestamp of the last received message of any kind.
    pub last_contact: Option<i64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Barometric altitude in meters.
    pub baro_altitude: Option<f64>,
    /// Whether the position was retrieved from a surface report.
    pub on_ground: Option<bool>,
    /// Ground speed in meters per second.
    pub velocity: Option<f64>,
    /// Track angle in degrees clockwise from north (0-360).
    pub true_track: Option<f64>,
    /// Vertical rate in meters per second (positive = climb).
    pub vertical_rate: Option<f64>,
    /// IDs of the receivers that contributed to this vector.
    pub sensors: Option<Vec<u64>>,
    /// Geometric altitude in meters.
    pub geo_altitude: Option<f64>,
    /// Transponder code.
    pub squawk: Option<String>,
    /// Special purpose indicator flag.
    pub spi: Option<bool>,
    /// Origin of the position report.
    pub position_source: Option<PositionSource>,
}

impl StateVector {
    /// Parse one raw 17-element positional record.
    pub fn from_raw(raw: &[Value]) -> Result<Self, StateError> {
        if raw.len() != STATE_VECTOR_FIELDS {
            return Err(StateError::WrongArity(raw.len()));
        }

        Ok(Self {
            icao24: required_str(&raw[0], "icao24")?,
            callsign: opt_str(&raw[1]),
            origin_country: required_str(&raw[2], "origin_country")?,
            time_position: opt_i64(&raw[3]),
            last_contact: opt_i64(&raw[4]),
            longitude: opt_f64(&raw[5]),
            latitude: opt_f64(&raw[6]),
            baro_altitude: opt_f64(&raw[7]),
            on_ground: opt_bool(&raw[8]),
            velocity: opt_f64(&raw[9]),
            true_track: opt_f64(&raw[10]),
            vertical_rate: opt_f64(&raw[11]),
            sensors: opt_sensor_list(&raw[12]),
            geo_altitude: opt_f64(&raw[13]),
            squawk: opt_str(&raw[14]),
            spi: opt_bool(&raw[15]),
            position_source: opt_i64(&raw[16])
                .and_then(|code| u64::try_from(code).ok())
                .and_then(PositionSource::from_code),
        })
    }

    /// Whether this vector carries a usable geographic position.
    #[must_use]
    pub fn has_position(&self) -> bool {
        self.longitude.is_some() && self.latitude.is_some()
    }
}

fn required_str(value: &Value, field: &'static str) -> Result<String, StateError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| StateError::InvalidValue {
            field,
            value: value.to_string(),
        })
}

fn opt_str(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

fn opt_f64(value: &Value) -> Option<f64> {
    value.as_f64()
}

fn opt_i64(value: &Value) -> Option<i64> {
    value.as_i64()
}

fn opt_bool(value: &Value) -> Option<bool> {
    value.as_bool()
}

fn opt_sensor_list(value: &Value) -> Option<Vec<u64>> {
    value
        .as_array()
        .map(|ids| ids.iter().filter_map(Value::as_u64).collect())
}
