#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Output generation for the barrio map pipeline.
//!
//! Serializes the pipeline's in-memory results into the files the site
//! consumes: a geocoded-points GeoJSON, the fishnet GeoJSON, a joined
//! "occupied cells" GeoJSON for the map component, a coordinates index
//! for the directory, and a summary statistics JSON. All file I/O for
//! the pipeline lives here; the core crates stay pure.

pub mod coordinates;
pub mod fishnet;
pub mod points;
pub mod stats;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Errors writing output files.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Creating or writing the file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes a value as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be created or serialization
/// fails.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), GenerateError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    log::info!("Saved {}", path.display());
    Ok(())
}

/// CRS member declaring WGS84, carried on every output collection for
/// GIS tool compatibility.
#[must_use]
pub fn crs_member() -> serde_json::Value {
    serde_json::json!({
        "type": "name",
        "properties": { "name": "urn:ogc:def:crs:OGC:1.3:CRS84" }
    })
}
