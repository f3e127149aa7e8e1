//! Compact id-to-coordinates index for the business directory.
//!
//! The directory page looks coordinates up by business id instead of
//! re-reading the full points GeoJSON, so this index only carries the
//! position and precision label per id.

use std::collections::BTreeMap;

use barrio_map_geo_models::GeocodedRecord;
use serde::Serialize;

use crate::stats::tier_label;

/// One directory entry: where the business sits and how it was placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinateEntry {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Precision tier label.
    pub precision: &'static str,
}

/// Builds the id-keyed coordinate index. `BTreeMap` keeps the output
/// ordering stable across runs.
#[must_use]
pub fn coordinate_index(records: &[GeocodedRecord]) -> BTreeMap<String, CoordinateEntry> {
    records
        .iter()
        .map(|record| {
            (
                record.id.clone(),
                CoordinateEntry {
                    lat: record.point.latitude,
                    lon: record.point.longitude,
                    precision: tier_label(record.precision_tier),
                },
            )
        })
        .collect()
}
