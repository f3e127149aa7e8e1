//! Calibration tables for the street-axis interpolation.
//!
//! The default calibration for Barrio San José y El Bosque is embedded at
//! compile time from `calibration/barrio_san_jose.toml`; alternate
//! calibrations (another neighborhood, refined measurements) load from a
//! user-supplied TOML path.

use std::path::Path;

use barrio_map_geo_models::GeoPoint;
use serde::Deserialize;

use crate::CalibrationError;

/// A numbered way axis: the fixed perpendicular coordinate varies
/// linearly with the way number between two calibrated endpoints.
///
/// For the calle axis the coordinate is latitude; for the carrera axis
/// it is longitude.
#[derive(Debug, Clone, Deserialize)]
pub struct Axis {
    /// Lowest calibrated way number.
    pub low_number: u32,
    /// Highest calibrated way number.
    pub high_number: u32,
    /// Coordinate at `low_number`.
    pub coord_at_low: f64,
    /// Coordinate at `high_number`.
    pub coord_at_high: f64,
    /// Free-coordinate default used when an address on this axis has no
    /// usable cross-way number.
    pub default_cross_coord: f64,
}

impl Axis {
    /// Whether a way number falls inside the calibrated block range.
    #[must_use]
    pub const fn in_range(&self, number: u32) -> bool {
        number >= self.low_number && number <= self.high_number
    }

    /// The coordinate for a way number, interpolated linearly between
    /// the axis endpoints.
    ///
    /// The interpolation parameter is clamped to `[0, 1]`, so numbers
    /// outside the calibrated range degrade to the nearest endpoint
    /// rather than extrapolating past it.
    #[must_use]
    pub fn position(&self, number: u32) -> f64 {
        let span = f64::from(self.high_number - self.low_number);
        let t = if span == 0.0 {
            0.0
        } else {
            ((f64::from(number) - f64::from(self.low_number)) / span).clamp(0.0, 1.0)
        };
        (self.coord_at_high - self.coord_at_low).mul_add(t, self.coord_at_low)
    }
}

/// Per-record uniform jitter bounds for the area fallback, in degrees.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Jitter {
    /// Half-width of the latitude jitter window.
    pub latitude: f64,
    /// Half-width of the longitude jitter window.
    pub longitude: f64,
}

/// A verified location with known coordinates, optionally carrying the
/// street address it answers for.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferencePoint {
    /// Unique identifier.
    pub id: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Street address, when known. Addresses normalizing to the same
    /// string as an input record resolve to this point exactly.
    #[serde(default)]
    pub address: Option<String>,
}

/// The full calibration set for one neighborhood.
#[derive(Debug, Clone, Deserialize)]
pub struct Calibration {
    /// Lowest primary way number considered inside the neighborhood.
    pub primary_low: u32,
    /// Highest primary way number considered inside the neighborhood.
    pub primary_high: u32,
    /// East–west axis (number maps to latitude).
    pub calle: Axis,
    /// North–south axis (number maps to longitude).
    pub carrera: Axis,
    /// Neighborhood centroid used by the area fallback.
    pub centroid: GeoPoint,
    /// Jitter bounds for the area fallback.
    pub jitter: Jitter,
    /// Verified reference points.
    #[serde(default)]
    pub reference_points: Vec<ReferencePoint>,
}

/// The embedded default calibration.
const BARRIO_SAN_JOSE_TOML: &str = include_str!("../calibration/barrio_san_jose.toml");

impl Calibration {
    /// The built-in calibration for Barrio San José y El Bosque.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (a compile-time
    /// guarantee, exercised by tests).
    #[must_use]
    pub fn barrio_san_jose() -> Self {
        toml::de::from_str(BARRIO_SAN_JOSE_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded calibration: {e}"))
    }

    /// Loads a calibration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, CalibrationError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::de::from_str(&contents)?)
    }
}
