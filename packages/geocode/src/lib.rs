#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoding for the barrio business directory.
//!
//! Resolves parsed Colombian addresses to coordinates by linear
//! interpolation along calibrated street axes, with two refinements on
//! either side of the interpolation:
//!
//! 1. Addresses matching a verified **reference point** snap to its
//!    coordinates exactly.
//! 2. Records with no usable address fall back to the **neighborhood
//!    centroid plus bounded random jitter**, so unresolved businesses
//!    never collapse onto a single map marker.
//!
//! Calibration (axis endpoints, reference points, jitter bounds) is an
//! immutable [`Calibration`] value passed in at construction, loaded
//! from TOML so per-city recalibration is a config file, not a code
//! edit.

pub mod calibration;
pub mod interpolate;
pub mod pipeline;

pub use calibration::{Axis, Calibration, ReferencePoint};
pub use interpolate::{Interpolated, Interpolator};
pub use pipeline::Geocoder;

use thiserror::Error;

/// Errors loading a calibration file.
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// Reading the file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML was malformed or missing required fields.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
