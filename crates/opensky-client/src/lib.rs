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

//! Client library for the OpenSky Network live state vector API.
//!
//! The pipeline is deliberately small and strictly sequential:
//!
//! - **Client layer**: one authenticated blocking GET per refresh, with a
//!   request timeout and bounded retry ([`OpenSkyClient`])
//! - **State layer**: typed parsing of the raw 17-element positional
//!   records ([`StateVector`])
//! - **Table layer**: fixed-schema tabulation and bulk Web Mercator
//!   projection ([`StateTable`])
//!
//! # Quick Start
//!
//! ```no_run
//! use opensky_client::{BoundingBox, ClientConfig, OpenSkyClient, StateTable};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenSkyClient::new(ClientConfig::default())?;
//!     let bbox = BoundingBox::new(45.8, 5.9, 47.8, 10.5)?;
//!
//!     let mut table = StateTable::from_states(client.get_states(&bbox)?);
//!     table.project();
//!
//!     for (row, point) in table.points().iter().enumerate() {
//!         if let Some(point) = point {
//!             println!(
//!                 "{} at ({:.0}, {:.0}) m, icon rotation {:.1}°",
//!                 table.display(row, "callsign"),
//!                 point.x,
//!                 point.y,
//!                 point.rot_angle,
//!             );
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod mercator;
pub mod state;
pub mod table;

pub use client::{
    BoundingBox, BoundsError, ClientConfig, Credentials, FetchError, OpenSkyClient,
};
pub use mercator::{meters_per_pixel, wgs84_to_web_mercator, EARTH_RADIUS_M, TILE_SIZE};
pub use state::{PositionSource, StateError, StateVector, STATE_VECTOR_FIELDS};
pub use table::{Cell, PlanePoint, StateTable, NO_DATA};
