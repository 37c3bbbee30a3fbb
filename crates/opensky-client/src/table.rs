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

//! Fixed-schema table of aircraft state vectors.
//!
//! [`StateTable`] holds one row per fetched [`StateVector`] under the 17
//! named columns of the OpenSky schema, in fixed order. Cells stay typed;
//! a missing value renders as the `"No Data"` sentinel only when displayed,
//! so numeric columns are never corrupted by a string placeholder.
//!
//! [`StateTable::project`] is the bulk form of the Web Mercator projection:
//! it fills an `x`/`y`/`rot_angle` point for every row with a known
//! position, in place, and returns the mutated table for chaining.

use std::fmt;

use crate::mercator::wgs84_to_web_mercator;
use crate::state::{PositionSource, StateVector, STATE_VECTOR_FIELDS};

/// Sentinel shown for any missing cell.
pub const NO_DATA: &str = "No Data";

/// A single typed table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    IntList(Vec<u64>),
    Missing,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::IntList(ids) => {
                let rendered: Vec<String> = ids.iter().map(ToString::to_string).collect();
                f.write_str(&rendered.join(","))
            }
            Self::Missing => f.write_str(NO_DATA),
        }
    }
}

/// A row's projected map position, derived from `longitude`/`latitude`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanePoint {
    /// Web Mercator x in meters.
    pub x: f64,
    /// Web Mercator y in meters.
    pub y: f64,
    /// Icon rotation in degrees, the negated true track. Zero when the
    /// aircraft reported no heading.
    pub rot_angle: f64,
}

/// Table of state vectors with the fixed 17-column OpenSky schema.
#[derive(Debug, Clone, Default)]
pub struct StateTable {
    states: Vec<StateVector>,
    points: Vec<Option<PlanePoint>>,
}

impl StateTable {
    /// Column names in positional record order.
    pub const COLUMNS: [&'static str; STATE_VECTOR_FIELDS] = [
        "icao24",
        "callsign",
        "origin_country",
        "time_position",
        "last_contact",
        "longitude",
        "latitude",
        "baro_altitude",
        "on_ground",
        "velocity",
        "true_track",
        "vertical_rate",
        "sensors",
        "geo_altitude",
        "squawk",
        "spi",
        "position_source",
    ];

    /// Build a table from fetched state vectors, one row per record.
    /// An empty input yields zero rows under the full column schema.
    #[must_use]
    pub fn from_states(states: Vec<StateVector>) -> Self {
        Self {
            states,
            points: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn states(&self) -> &[StateVector] {
        &self.states
    }

    /// Look up a cell by row index and column name. Returns `None` for an
    /// out-of-range row or unknown column; a known cell with no value is
    /// `Some(Cell::Missing)`.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<Cell> {
        let sv = self.states.get(row)?;

        let cell = match column {
            "icao24" => Cell::Text(sv.icao24.clone()),
            "callsign" => text_or_missing(sv.callsign.clone()),
            "origin_country" => Cell::Text(sv.origin_country.clone()),
            "time_position" => int_or_missing(sv.time_position),
            "last_contact" => int_or_missing(sv.last_contact),
            "longitude" => float_or_missing(sv.longitude),
            "latitude" => float_or_missing(sv.latitude),
            "baro_altitude" => float_or_missing(sv.baro_altitude),
            "on_ground" => bool_or_missing(sv.on_ground),
            "velocity" => float_or_missing(sv.velocity),
            "true_track" => float_or_missing(sv.true_track),
            "vertical_rate" => float_or_missing(sv.vertical_rate),
            "sensors" => sv.sensors.clone().map_or(Cell::Missing, Cell::IntList),
            "geo_altitude" => float_or_missing(sv.geo_altitude),
            "squawk" => text_or_missing(sv.squawk.clone()),
            "spi" => bool_or_missing(sv.spi),
            "position_source" => sv
                .position_source
                .map_or(Cell::Missing, |src| Cell::Int(source_code(src))),
            _ => return None,
        };

        Some(cell)
    }

    /// Render a cell for display, substituting the sentinel for anything
    /// missing or out of range.
    #[must_use]
    pub fn display(&self, row: usize, column: &str) -> String {
        self.cell(row, column)
            .unwrap_or(Cell::Missing)
            .to_string()
    }

    /// Bulk Web Mercator projection over the whole table.
    ///
    /// Writes one [`PlanePoint`] per row in place and returns the mutated
    /// table. Rows without a position get `None`.
    pub fn project(&mut self) -> &mut Self {
        self.points = self
            .states
            .iter()
            .map(|sv| {
                let (lon, lat) = (sv.longitude?, sv.latitude?);
                let (x, y) = wgs84_to_web_mercator(lon, lat);
                Some(PlanePoint {
                    x,
                    y,
                    rot_angle: -sv.true_track.unwrap_or(0.0),
                })
            })
            .collect();
        self
    }

    /// Projected points, one entry per row. Empty until [`Self::project`]
    /// has run.
    #[must_use]
    pub fn points(&self) -> &[Option<PlanePoint>] {
        &self.points
    }
}

fn text_or_missing(value: Option<String>) -> Cell {
    value.map_or(Cell::Missing, Cell::Text)
}

fn int_or_missing(value: Option<i64>) -> Cell {
    value.map_or(Cell::Missing, Cell::Int)
}

fn float_or_missing(value: Option<f64>) -> Cell {
    value.map_or(Cell::Missing, Cell::Float)
}

fn bool_or_missing(value: Option<bool>) -> Cell {
    value.map_or(Cell::Missing, Cell::Bool)
}

fn source_code(source: PositionSource) -> i64 {
    match source {
        PositionSource::AdsB => 0,
        PositionSource::Asterix => 1,
        PositionSource::Mlat => 2,
        PositionSource::Flarm => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mercator::EARTH_RADIUS_M;
    use crate::state::StateVector;
    use serde_json::{json, Value};
    use std::f64::consts::PI;

    fn example_states() -> Vec<StateVector> {
        let records = json!([
            [
                "abc123", "SWA123  ", "United States", 1_600_000_000, 1_600_000_005,
                -97.5, 35.2, 10000.0, false, 230.5, 90.0, 0.0, null, 10500.0,
                "1200", false, 0
            ],
            [
                "def456", null, "Germany", null, 1_600_000_010,
                null, null, null, true, 4.2, null, null, null, null,
                null, false, 1
            ]
        ]);

        records
            .as_array()
            .unwrap()
            .iter()
            .map(|r| StateVector::from_raw(r.as_array().unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_schema_shape() {
        let table = StateTable::from_states(example_states());
        assert_eq!(table.len(), 2);
        assert_eq!(StateTable::COLUMNS.len(), 17);
        assert_eq!(StateTable::COLUMNS[0], "icao24");
        assert_eq!(StateTable::COLUMNS[16], "position_source");
    }

    #[test]
    fn test_empty_input_keeps_schema() {
        let mut table = StateTable::from_states(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.project().points().len(), 0);
        for column in StateTable::COLUMNS {
            assert_eq!(table.cell(0, column), None);
        }
    }

    #[test]
    fn test_typed_cells_survive_and_missing_renders_sentinel() {
        let table = StateTable::from_states(example_states());

        // Present values keep their type and content.
        assert_eq!(table.cell(0, "squawk"), Some(Cell::Text("1200".into())));
        assert_eq!(table.cell(0, "velocity"), Some(Cell::Float(230.5)));
        assert_eq!(table.cell(0, "on_ground"), Some(Cell::Bool(false)));

        // Missing values are typed Missing and display as the sentinel.
        assert_eq!(table.cell(0, "sensors"), Some(Cell::Missing));
        assert_eq!(table.display(0, "sensors"), NO_DATA);
        assert_eq!(table.display(1, "callsign"), NO_DATA);
        assert_eq!(table.display(1, "baro_altitude"), NO_DATA);
    }

    #[test]
    fn test_unknown_column_rejected() {
        let table = StateTable::from_states(example_states());
        assert_eq!(table.cell(0, "registration"), None);
        assert_eq!(table.display(0, "registration"), NO_DATA);
    }

    #[test]
    fn test_bulk_projection_matches_scalar() {
        let mut table = StateTable::from_states(example_states());
        table.project();
        assert_eq!(table.points().len(), table.len());

        for (sv, point) in table.states().iter().zip(table.points()) {
            match (sv.longitude, sv.latitude) {
                (Some(lon), Some(lat)) => {
                    let (x, y) = wgs84_to_web_mercator(lon, lat);
                    let point = point.expect("positioned row must project");
                    assert_eq!(point.x, x);
                    assert_eq!(point.y, y);
                }
                _ => assert!(point.is_none()),
            }
        }
    }

    #[test]
    fn test_worked_example_row() {
        // End-to-end expectations for the first example record.
        let mut table = StateTable::from_states(example_states());
        table.project();

        let point = table.points()[0].unwrap();
        assert_eq!(point.x, -97.5 * (EARTH_RADIUS_M * PI / 180.0));
        assert_eq!(point.rot_angle, -90.0);
        assert_eq!(table.display(0, "squawk"), "1200");
        assert_eq!(table.display(0, "sensors"), NO_DATA);
    }

    #[test]
    fn test_missing_track_projects_with_zero_rotation() {
        let record = json!([
            "aaa111", null, "France", null, null, 2.35, 48.85, null, false,
            null, null, null, null, null, null, false, 0
        ]);
        let raw: Vec<Value> = record.as_array().unwrap().clone();
        let mut table =
            StateTable::from_states(vec![StateVector::from_raw(&raw).unwrap()]);
        table.project();
        assert_eq!(table.points()[0].unwrap().rot_angle, 0.0);
    }
}
