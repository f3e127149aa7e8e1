#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared types for the barrio map geodata pipeline.
//!
//! These types flow between the pipeline stages: business records in,
//! parsed addresses and geocoded points through the middle, fishnet grid
//! cells out. They are independent of any particular input or output file
//! format; serialization concerns live in `barrio_map_generate`.

use geo_types::MultiPolygon;
use serde::{Deserialize, Serialize};

/// A geographic point in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// The kind of numbered urban way in a Colombian address.
///
/// Calles run east–west (latitude varies with the number), carreras run
/// north–south (longitude varies with the number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WayType {
    /// A street ("CL" / "CALLE").
    Calle,
    /// A numbered north–south road ("CR" / "CRA" / "CARRERA" / "KR").
    Carrera,
}

/// Structured result of parsing a free-text Colombian urban address.
///
/// A failed parse is represented by the absence of this value, never by a
/// zeroed-out struct, so `primary_number` is always meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedAddress {
    /// Way type of the primary (named-first) axis.
    pub primary_way: WayType,
    /// Numbered identifier of the primary way.
    pub primary_number: u32,
    /// Way type of the cross way, when the address names one explicitly
    /// (e.g. "CL 20 CON CR 25").
    pub secondary_way: Option<WayType>,
    /// Numbered identifier of the cross way.
    pub secondary_number: Option<u32>,
    /// Building/meters offset along the block (the "-65" in "24-65").
    pub plate_number: Option<u32>,
    /// The normalized (trimmed, uppercased) source string, retained for
    /// diagnostics.
    pub raw: String,
}

/// How a geocoded point was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrecisionTier {
    /// Matched a verified reference point.
    Exact,
    /// Interpolated along a street axis using both axis numbers.
    Interpolated,
    /// Interpolated using only the primary axis number.
    Approximate,
    /// No usable address: neighborhood centroid plus bounded jitter.
    AreaFallback,
}

/// A raw business record as loaded from the directory inventory.
///
/// Field fallbacks mirror the inventory's inconsistent sourcing: some
/// records carry `razon_social` instead of a display name, and the address
/// may live in either `direccion` or `direccion_comercial`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BusinessRecord {
    /// Stable identifier. Generated during geocoding when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub nombre: Option<String>,
    /// Registered business name, used when `nombre` is absent.
    #[serde(default)]
    pub razon_social: Option<String>,
    /// Free-text street address.
    #[serde(default)]
    pub direccion: Option<String>,
    /// Alternate address field used by some source datasets.
    #[serde(default)]
    pub direccion_comercial: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub telefono: Option<String>,
    /// Business category.
    #[serde(default)]
    pub categoria: Option<String>,
    /// Economic activity, used as category when `categoria` is absent.
    #[serde(default)]
    pub actividad_economica: Option<String>,
}

impl BusinessRecord {
    /// The display name, falling back to the registered name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nombre
            .as_deref()
            .or(self.razon_social.as_deref())
            .unwrap_or("Sin nombre")
    }

    /// The address string to geocode, falling back to the commercial
    /// address field. Empty when neither is present.
    #[must_use]
    pub fn address(&self) -> &str {
        self.direccion
            .as_deref()
            .or(self.direccion_comercial.as_deref())
            .unwrap_or("")
    }

    /// The business category, falling back to the economic activity.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.categoria
            .as_deref()
            .or(self.actividad_economica.as_deref())
    }
}

/// A business record with resolved coordinates.
///
/// Created once per input record; re-running the pipeline regenerates the
/// full set rather than updating records in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodedRecord {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The original free-text address.
    pub raw_address: String,
    /// Parse result, when the address was parseable.
    pub parsed_address: Option<ParsedAddress>,
    /// Resolved coordinates.
    pub point: GeoPoint,
    /// Which derivation branch produced `point`.
    pub precision_tier: PrecisionTier,
    /// Human-readable derivation method label.
    pub method: String,
    /// Contact phone number, passed through from the input record.
    pub phone: Option<String>,
    /// Business category, passed through from the input record.
    pub category: Option<String>,
}

/// One cell of the fishnet grid, clipped to the study-area boundary.
///
/// Cells reference assigned businesses by id only; the geocoded records
/// themselves are owned by the geocoding stage, and the assignment is
/// rebuilt from scratch on every join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    /// Stable sequential id in discovery order (e.g. `CELL_0001`).
    pub cell_id: String,
    /// Grid row index (south to north).
    pub row: usize,
    /// Grid column index (west to east).
    pub col: usize,
    /// The cell geometry after clipping to the study area. Cells at the
    /// boundary's edge are irregular, not full squares.
    pub polygon: MultiPolygon<f64>,
    /// Area of the clipped geometry in square meters.
    pub area_m2: f64,
    /// Geometric centroid of the clipped geometry.
    pub centroid: GeoPoint,
    /// Ids of the geocoded records assigned to this cell.
    pub business_ids: Vec<String>,
    /// Number of assigned records.
    pub business_count: usize,
}
