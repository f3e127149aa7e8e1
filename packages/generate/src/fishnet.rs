//! Fishnet grid cells as GeoJSON `FeatureCollection`s.
//!
//! Two renderings: the full grid (every clipped cell, for GIS work),
//! and the joined "occupied cells" collection the site's map component
//! loads, which keeps only cells with businesses and embeds the per-cell
//! business summaries.

use std::collections::BTreeMap;

use barrio_map_fishnet::{AssignmentStats, density_per_hectare};
use barrio_map_geo_models::{GeocodedRecord, GridCell};
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::stats::tier_label;

/// Builds the full-grid feature collection with per-cell metadata.
#[must_use]
pub fn fishnet_feature_collection(
    cells: &[GridCell],
    cell_size_m: f64,
    assignment: &AssignmentStats,
) -> FeatureCollection {
    let features = cells.iter().map(cell_feature).collect();

    let mut foreign = JsonObject::new();
    foreign.insert(
        "name".to_string(),
        "Fishnet - Barrio San José y El Bosque".into(),
    );
    foreign.insert("crs".to_string(), crate::crs_member());
    foreign.insert(
        "metadata".to_string(),
        serde_json::json!({
            "generatedAt": chrono::Utc::now().to_rfc3339(),
            "cellSizeM": cell_size_m,
            "totalCells": cells.len(),
            "cellsWithBusinesses": assignment.cells_with_points,
            "crs": "WGS84 (EPSG:4326)",
        }),
    );

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign),
    }
}

fn cell_feature(cell: &GridCell) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("cellId".to_string(), cell.cell_id.clone().into());
    properties.insert("row".to_string(), cell.row.into());
    properties.insert("col".to_string(), cell.col.into());
    properties.insert("areaM2".to_string(), cell.area_m2.round().into());
    properties.insert(
        "centroid".to_string(),
        serde_json::json!([cell.centroid.longitude, cell.centroid.latitude]),
    );
    properties.insert("businessCount".to_string(), cell.business_count.into());
    properties.insert(
        "businessIds".to_string(),
        serde_json::json!(cell.business_ids),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::from(&cell.polygon))),
        id: Some(Id::String(cell.cell_id.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Builds the joined collection for the site map: occupied cells only,
/// each embedding its business summaries and derived density.
#[must_use]
pub fn occupied_cells_feature_collection(
    cells: &[GridCell],
    records: &[GeocodedRecord],
) -> FeatureCollection {
    let by_id: BTreeMap<&str, &GeocodedRecord> =
        records.iter().map(|r| (r.id.as_str(), r)).collect();

    let features = cells
        .iter()
        .filter(|cell| cell.business_count > 0)
        .map(|cell| {
            let businesses: Vec<serde_json::Value> = cell
                .business_ids
                .iter()
                .filter_map(|id| by_id.get(id.as_str()))
                .map(|record| {
                    serde_json::json!({
                        "id": record.id,
                        "name": record.name,
                        "address": record.raw_address,
                        "category": record.category,
                        "precision": tier_label(record.precision_tier),
                        "coordinates": [record.point.longitude, record.point.latitude],
                    })
                })
                .collect();

            let mut properties = JsonObject::new();
            properties.insert("cellId".to_string(), cell.cell_id.clone().into());
            properties.insert("businessCount".to_string(), cell.business_count.into());
            properties.insert(
                "density".to_string(),
                ((density_per_hectare(cell) * 100.0).round() / 100.0).into(),
            );
            properties.insert("businesses".to_string(), businesses.into());

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::from(&cell.polygon))),
                id: Some(Id::String(cell.cell_id.clone())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barrio_map_geo_models::{GeoPoint, PrecisionTier};
    use geo_types::{MultiPolygon, polygon};

    fn cell(id: &str, business_ids: &[&str]) -> GridCell {
        let square = polygon![
            (x: -75.68, y: 4.53),
            (x: -75.679, y: 4.53),
            (x: -75.679, y: 4.531),
            (x: -75.68, y: 4.531),
            (x: -75.68, y: 4.53),
        ];
        GridCell {
            cell_id: id.to_string(),
            row: 0,
            col: 0,
            polygon: MultiPolygon::new(vec![square]),
            area_m2: 2500.0,
            centroid: GeoPoint {
                latitude: 4.5305,
                longitude: -75.6795,
            },
            business_ids: business_ids.iter().map(ToString::to_string).collect(),
            business_count: business_ids.len(),
        }
    }

    fn record(id: &str) -> GeocodedRecord {
        GeocodedRecord {
            id: id.to_string(),
            name: format!("Negocio {id}"),
            raw_address: "CL 20 24-65".to_string(),
            parsed_address: None,
            point: GeoPoint {
                latitude: 4.5305,
                longitude: -75.6795,
            },
            precision_tier: PrecisionTier::Interpolated,
            method: "interpolacion_ejes_viales".to_string(),
            phone: None,
            category: None,
        }
    }

    #[test]
    fn full_grid_keeps_every_cell() {
        let cells = vec![cell("CELL_0001", &["a"]), cell("CELL_0002", &[])];
        let assignment = AssignmentStats {
            assigned: 1,
            unassigned_ids: Vec::new(),
            cells_with_points: 1,
            max_per_cell: 1,
        };
        let fc = fishnet_feature_collection(&cells, 50.0, &assignment);
        assert_eq!(fc.features.len(), 2);
        let metadata = fc.foreign_members.as_ref().expect("foreign")["metadata"].clone();
        assert_eq!(metadata["totalCells"], 2);
        assert_eq!(metadata["cellsWithBusinesses"], 1);
    }

    #[test]
    fn occupied_collection_drops_empty_cells() {
        let cells = vec![cell("CELL_0001", &["a"]), cell("CELL_0002", &[])];
        let records = vec![record("a")];
        let fc = occupied_cells_feature_collection(&cells, &records);
        assert_eq!(fc.features.len(), 1);
        let props = fc.features[0].properties.as_ref().expect("properties");
        assert_eq!(props.get("businessCount"), Some(&serde_json::Value::from(1)));
        let businesses = props.get("businesses").and_then(|v| v.as_array()).expect("array");
        assert_eq!(businesses[0]["name"], "Negocio a");
    }

    #[test]
    fn cell_features_carry_polygon_geometry() {
        let cells = vec![cell("CELL_0001", &[])];
        let assignment = AssignmentStats {
            assigned: 0,
            unassigned_ids: Vec::new(),
            cells_with_points: 0,
            max_per_cell: 0,
        };
        let fc = fishnet_feature_collection(&cells, 50.0, &assignment);
        let geometry = fc.features[0].geometry.as_ref().expect("geometry");
        assert!(matches!(geometry.value, Value::MultiPolygon(_)));
    }
}
