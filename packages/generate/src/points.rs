//! Geocoded business points as a GeoJSON `FeatureCollection`.

use barrio_map_geo_models::GeocodedRecord;
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::stats::{PrecisionBreakdown, tier_label};

/// Builds the point-feature collection: one `Point` feature per record
/// with the directory properties the map component reads.
#[must_use]
pub fn points_feature_collection(records: &[GeocodedRecord]) -> FeatureCollection {
    let features = records.iter().map(point_feature).collect();

    let mut foreign = JsonObject::new();
    foreign.insert(
        "name".to_string(),
        "Negocios Geocodificados - Barrio San José y El Bosque".into(),
    );
    foreign.insert("crs".to_string(), crate::crs_member());
    foreign.insert(
        "metadata".to_string(),
        serde_json::json!({
            "generatedAt": chrono::Utc::now().to_rfc3339(),
            "totalRecords": records.len(),
            "byPrecision": PrecisionBreakdown::from_records(records),
            "method": "street-axis interpolation + verified reference points",
        }),
    );

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign),
    }
}

fn point_feature(record: &GeocodedRecord) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), record.id.clone().into());
    properties.insert("name".to_string(), record.name.clone().into());
    properties.insert("address".to_string(), record.raw_address.clone().into());
    properties.insert(
        "phone".to_string(),
        record.phone.clone().map_or(serde_json::Value::Null, Into::into),
    );
    properties.insert(
        "category".to_string(),
        record.category.clone().map_or(serde_json::Value::Null, Into::into),
    );
    properties.insert(
        "precision".to_string(),
        tier_label(record.precision_tier).into(),
    );
    properties.insert("method".to_string(), record.method.clone().into());

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            record.point.longitude,
            record.point.latitude,
        ]))),
        id: Some(Id::String(record.id.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}
