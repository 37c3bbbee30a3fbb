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

//! Forward Web Mercator (EPSG:3857) projection.
//!
//! Converts WGS84 geographic coordinates in degrees to planar map
//! coordinates in meters on the spherical web-map projection used by
//! slippy-map tile servers. The projection is undefined at the poles;
//! `lat = ±90` produces `±inf`, which is accepted rather than clamped.

use std::f64::consts::PI;

/// Earth radius of the spherical Web Mercator datum, in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Width of a basemap tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Project a single WGS84 `(lon, lat)` pair (degrees) to Web Mercator
/// `(x, y)` meters.
#[must_use]
pub fn wgs84_to_web_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let x = lon * (EARTH_RADIUS_M * PI / 180.0);
    let y = ((90.0 + lat) * PI / 360.0).tan().ln() * EARTH_RADIUS_M;
    (x, y)
}

/// Projected-space extent of the map, in meters. The world spans
/// `[-world/2, world/2]` on both axes.
#[must_use]
pub fn world_size_m() -> f64 {
    2.0 * PI * EARTH_RADIUS_M
}

/// Meters of projected space covered by one screen pixel at the given
/// (possibly fractional) zoom level.
#[must_use]
pub fn meters_per_pixel(zoom: f64) -> f64 {
    world_size_m() / (f64::from(TILE_SIZE) * 2_f64.powf(zoom))
}
