//! Point-to-cell assignment: buckets geocoded records into grid cells.
//!
//! An R-tree over cell envelopes narrows the candidate cells per point;
//! candidates are then tested in ascending cell order, so the observable
//! behavior is exactly a first-match scan over the cells as given. A
//! point on the shared edge of two adjacent cells therefore lands in the
//! lower-indexed cell, once, never in both.

use barrio_map_geo_models::{GeocodedRecord, GridCell};
use geo::{BoundingRect, Intersects, Point};
use rstar::{AABB, RTree, RTreeObject};

/// A cell's bounding box in the R-tree, carrying its index into the
/// cell slice.
struct CellEnvelope {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for CellEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Outcome of a point-to-cell join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentStats {
    /// Number of records assigned to some cell.
    pub assigned: usize,
    /// Ids of records falling outside every cell. These are excluded
    /// from all cell counts. They are tallied, not silently dropped,
    /// and never defaulted into a cell.
    pub unassigned_ids: Vec<String>,
    /// Number of cells with at least one assigned record.
    pub cells_with_points: usize,
    /// Largest per-cell record count.
    pub max_per_cell: usize,
}

/// Assigns each record to the first cell (in the cells' given order)
/// whose clipped polygon contains its point.
///
/// `business_ids`/`business_count` are rebuilt from scratch; the
/// assignment is a derived relationship, recomputed on every join.
#[must_use]
pub fn assign_points(cells: &mut [GridCell], records: &[GeocodedRecord]) -> AssignmentStats {
    for cell in cells.iter_mut() {
        cell.business_ids.clear();
        cell.business_count = 0;
    }

    let envelopes: Vec<CellEnvelope> = cells
        .iter()
        .enumerate()
        .filter_map(|(index, cell)| {
            cell.polygon.bounding_rect().map(|rect| CellEnvelope {
                index,
                envelope: AABB::from_corners(
                    [rect.min().x, rect.min().y],
                    [rect.max().x, rect.max().y],
                ),
            })
        })
        .collect();
    let tree = RTree::bulk_load(envelopes);

    let mut unassigned_ids = Vec::new();

    for record in records {
        let point = Point::new(record.point.longitude, record.point.latitude);
        let query = AABB::from_point([record.point.longitude, record.point.latitude]);

        // Candidates come out of the R-tree in arbitrary order; sorting
        // by index restores the first-cell-wins contract.
        let mut candidates: Vec<usize> = tree
            .locate_in_envelope_intersecting(&query)
            .map(|e| e.index)
            .collect();
        candidates.sort_unstable();

        // Intersects (rather than Contains) keeps points sitting
        // exactly on a cell edge assignable; the index order decides
        // between adjacent cells.
        let hit = candidates
            .into_iter()
            .find(|&i| cells[i].polygon.intersects(&point));

        if let Some(i) = hit {
            cells[i].business_ids.push(record.id.clone());
            cells[i].business_count += 1;
        } else {
            unassigned_ids.push(record.id.clone());
        }
    }

    let assigned = records.len() - unassigned_ids.len();
    let cells_with_points = cells.iter().filter(|c| c.business_count > 0).count();
    let max_per_cell = cells.iter().map(|c| c.business_count).max().unwrap_or(0);

    if !unassigned_ids.is_empty() {
        log::info!(
            "{} of {} records fell outside every fishnet cell",
            unassigned_ids.len(),
            records.len()
        );
    }

    AssignmentStats {
        assigned,
        unassigned_ids,
        cells_with_points,
        max_per_cell,
    }
}

/// Derived per-cell density in records per hectare.
///
/// Computed on demand from `business_count` and `area_m2`; never stored
/// as an independent source of truth.
#[must_use]
pub fn density_per_hectare(cell: &GridCell) -> f64 {
    if cell.area_m2 <= 0.0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = cell.business_count as f64;
    count / (cell.area_m2 / 10_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use barrio_map_geo_models::{GeoPoint, PrecisionTier};
    use geo::{MultiPolygon, polygon};

    fn square_cell(id: &str, sw_lon: f64, sw_lat: f64, size_deg: f64) -> GridCell {
        let square = polygon![
            (x: sw_lon, y: sw_lat),
            (x: sw_lon + size_deg, y: sw_lat),
            (x: sw_lon + size_deg, y: sw_lat + size_deg),
            (x: sw_lon, y: sw_lat + size_deg),
            (x: sw_lon, y: sw_lat),
        ];
        GridCell {
            cell_id: id.to_string(),
            row: 0,
            col: 0,
            polygon: MultiPolygon::new(vec![square]),
            area_m2: 2500.0,
            centroid: GeoPoint {
                latitude: sw_lat + size_deg / 2.0,
                longitude: sw_lon + size_deg / 2.0,
            },
            business_ids: Vec::new(),
            business_count: 0,
        }
    }

    fn record_at(id: &str, lon: f64, lat: f64) -> GeocodedRecord {
        GeocodedRecord {
            id: id.to_string(),
            name: id.to_string(),
            raw_address: String::new(),
            parsed_address: None,
            point: GeoPoint {
                latitude: lat,
                longitude: lon,
            },
            precision_tier: PrecisionTier::Interpolated,
            method: "test".to_string(),
            phone: None,
            category: None,
        }
    }

    #[test]
    fn assigns_point_to_containing_cell() {
        let mut cells = vec![
            square_cell("CELL_0001", -75.68, 4.53, 0.001),
            square_cell("CELL_0002", -75.679, 4.53, 0.001),
        ];
        let records = vec![record_at("neg_1", -75.6785, 4.5305)];
        let stats = assign_points(&mut cells, &records);
        assert_eq!(stats.assigned, 1);
        assert_eq!(cells[1].business_ids, ["neg_1"]);
        assert!(cells[0].business_ids.is_empty());
    }

    #[test]
    fn overlapping_cells_never_double_count() {
        // Two identical cells: the point matches both geometrically but
        // must land only in the first.
        let mut cells = vec![
            square_cell("CELL_0001", -75.68, 4.53, 0.001),
            square_cell("CELL_0002", -75.68, 4.53, 0.001),
        ];
        let records = vec![record_at("neg_1", -75.6795, 4.5305)];
        let stats = assign_points(&mut cells, &records);
        assert_eq!(stats.assigned, 1);
        assert_eq!(cells[0].business_ids, ["neg_1"]);
        assert!(cells[1].business_ids.is_empty());
    }

    #[test]
    fn shared_edge_point_lands_in_lower_indexed_cell() {
        let mut cells = vec![
            square_cell("CELL_0001", -75.68, 4.53, 0.001),
            square_cell("CELL_0002", -75.679, 4.53, 0.001),
        ];
        // Exactly on the vertical edge both cells share.
        let records = vec![record_at("neg_1", -75.679, 4.5305)];
        let stats = assign_points(&mut cells, &records);
        assert_eq!(stats.assigned, 1);
        assert_eq!(cells[0].business_count + cells[1].business_count, 1);
        assert_eq!(cells[0].business_ids, ["neg_1"]);
    }

    #[test]
    fn far_away_point_is_tallied_unassigned() {
        let mut cells = vec![square_cell("CELL_0001", -75.68, 4.53, 0.001)];
        let records = vec![
            record_at("neg_inside", -75.6795, 4.5305),
            record_at("neg_far", -75.0, 5.5),
        ];
        let stats = assign_points(&mut cells, &records);
        assert_eq!(stats.assigned, 1);
        assert_eq!(stats.unassigned_ids, ["neg_far"]);
        assert_eq!(cells[0].business_count, 1);
        assert!(!cells[0].business_ids.contains(&"neg_far".to_string()));
    }

    #[test]
    fn reassignment_rebuilds_from_scratch() {
        let mut cells = vec![square_cell("CELL_0001", -75.68, 4.53, 0.001)];
        cells[0].business_ids.push("stale".to_string());
        cells[0].business_count = 1;
        let stats = assign_points(&mut cells, &[]);
        assert_eq!(stats.assigned, 0);
        assert!(cells[0].business_ids.is_empty());
        assert_eq!(cells[0].business_count, 0);
    }

    #[test]
    fn stats_track_occupancy_and_max() {
        let mut cells = vec![
            square_cell("CELL_0001", -75.68, 4.53, 0.001),
            square_cell("CELL_0002", -75.679, 4.53, 0.001),
            square_cell("CELL_0003", -75.678, 4.53, 0.001),
        ];
        let records = vec![
            record_at("a", -75.6795, 4.5305),
            record_at("b", -75.6796, 4.5306),
            record_at("c", -75.6785, 4.5305),
        ];
        let stats = assign_points(&mut cells, &records);
        assert_eq!(stats.assigned, 3);
        assert_eq!(stats.cells_with_points, 2);
        assert_eq!(stats.max_per_cell, 2);
    }

    #[test]
    fn density_derives_from_count_and_area() {
        let mut cell = square_cell("CELL_0001", -75.68, 4.53, 0.001);
        cell.business_count = 5;
        cell.area_m2 = 2500.0;
        let density = density_per_hectare(&cell);
        assert!((density - 20.0).abs() < 1e-9);
    }

    #[test]
    fn density_is_zero_for_degenerate_area() {
        let mut cell = square_cell("CELL_0001", -75.68, 4.53, 0.001);
        cell.business_count = 5;
        cell.area_m2 = 0.0;
        assert!((density_per_hectare(&cell) - 0.0).abs() < f64::EPSILON);
    }
}
