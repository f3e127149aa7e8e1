//! Input file loading for the pipeline binary.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use barrio_map_geo_models::BusinessRecord;
use geo_types::Polygon;
use geojson::{FeatureCollection, GeoJson};
use serde::Deserialize;
use thiserror::Error;

/// Errors reading the business directory or boundary files.
#[derive(Debug, Error)]
pub enum InputError {
    /// Opening or reading the file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON in the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The boundary file is not valid GeoJSON.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// No boundary feature matched the requested study area.
    #[error("no boundary feature with id {0:?}")]
    MissingBoundary(String),

    /// The boundary feature's geometry is not a polygon.
    #[error("boundary feature {0:?} has no polygon geometry")]
    NotAPolygon(String),
}

/// The business directory file, either a bare array or wrapped in a
/// `negocios` envelope. Both shapes ship in the source data.
#[derive(Deserialize)]
#[serde(untagged)]
enum BusinessesFile {
    Wrapped { negocios: Vec<BusinessRecord> },
    Bare(Vec<BusinessRecord>),
}

/// Loads the business directory.
///
/// # Errors
///
/// Returns an error if the file cannot be read or deserialized.
pub fn load_businesses(path: &Path) -> Result<Vec<BusinessRecord>, InputError> {
    let file = File::open(path)?;
    let parsed: BusinessesFile = serde_json::from_reader(BufReader::new(file))?;
    let records = match parsed {
        BusinessesFile::Wrapped { negocios } => negocios,
        BusinessesFile::Bare(records) => records,
    };
    log::info!("Loaded {} business records from {}", records.len(), path.display());
    Ok(records)
}

/// Loads the study-area boundary polygon from a GeoJSON file.
///
/// Picks the feature whose `id` property matches `study_area_id`,
/// falling back to the first feature when none matches by id. A
/// `MultiPolygon` boundary contributes its first polygon.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a GeoJSON
/// feature collection, or holds no usable polygon.
pub fn load_boundary(path: &Path, study_area_id: &str) -> Result<Polygon<f64>, InputError> {
    let file = File::open(path)?;
    let geojson: GeoJson = serde_json::from_reader(BufReader::new(file))?;
    let collection = FeatureCollection::try_from(geojson)?;

    let feature = collection
        .features
        .iter()
        .find(|feature| {
            feature
                .properties
                .as_ref()
                .and_then(|props| props.get("id"))
                .and_then(|id| id.as_str())
                == Some(study_area_id)
        })
        .or_else(|| collection.features.first())
        .ok_or_else(|| InputError::MissingBoundary(study_area_id.to_string()))?;

    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| InputError::NotAPolygon(study_area_id.to_string()))?;

    match &geometry.value {
        value @ geojson::Value::Polygon(_) => Ok(Polygon::try_from(value.clone())?),
        value @ geojson::Value::MultiPolygon(_) => {
            let multi = geo_types::MultiPolygon::try_from(value.clone())?;
            multi
                .0
                .into_iter()
                .next()
                .ok_or_else(|| InputError::NotAPolygon(study_area_id.to_string()))
        }
        _ => Err(InputError::NotAPolygon(study_area_id.to_string())),
    }
}
