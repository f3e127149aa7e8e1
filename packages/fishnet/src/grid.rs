//! Square-grid ("fishnet") construction over the study-area polygon.

use barrio_map_geo_models::{GeoPoint, GridCell};
use geo::{Area, BooleanOps, BoundingRect, Centroid, GeodesicArea, Polygon, Rect, coord};

use crate::FishnetError;

/// Approximate meters per degree of latitude (WGS84).
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Converts a cell size in meters to (longitude, latitude) degree spans
/// at the given latitude.
pub(crate) fn cell_size_degrees(cell_size_m: f64, latitude_deg: f64) -> (f64, f64) {
    let dlat = cell_size_m / METERS_PER_DEGREE;
    let dlon = cell_size_m / (METERS_PER_DEGREE * latitude_deg.to_radians().cos());
    (dlon, dlat)
}

/// Number of grid steps needed to cover a span, tolerant of the float
/// noise in an exactly-divisible span.
fn steps_covering(span: f64, step: f64) -> usize {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = ((span / step) - 1e-9).ceil().max(1.0) as usize;
    n
}

/// Builds the fishnet grid: a regular square grid over the boundary's
/// bounding box, with every cell clipped to the boundary and cells that
/// miss it entirely dropped.
///
/// Cells are discovered column-major (west to east, south to north
/// within a column) and receive zero-padded sequential ids in that
/// order; `row`/`col` are the true grid indices of the traversal. The
/// retained geometry is the *clipped* intersection, so cells along the
/// boundary's edge are irregular; their area and centroid reflect the
/// part inside the study area, not the full square.
///
/// A degenerate boundary (empty, or zero width/height) yields an empty
/// grid. Deterministic apart from floating-point variation: the same
/// inputs produce the same cell count and id order.
///
/// # Errors
///
/// Returns [`FishnetError::InvalidCellSize`] if `cell_size_m` is not a
/// positive finite number.
#[allow(clippy::cast_precision_loss)]
pub fn build_fishnet(
    boundary: &Polygon<f64>,
    cell_size_m: f64,
) -> Result<Vec<GridCell>, FishnetError> {
    if !cell_size_m.is_finite() || cell_size_m <= 0.0 {
        return Err(FishnetError::InvalidCellSize(cell_size_m));
    }

    let Some(bbox) = boundary.bounding_rect() else {
        log::warn!("Study-area boundary has no extent; fishnet is empty");
        return Ok(Vec::new());
    };

    let width = bbox.width();
    let height = bbox.height();
    if width <= 0.0 || height <= 0.0 {
        log::warn!("Study-area boundary is degenerate (zero area); fishnet is empty");
        return Ok(Vec::new());
    }

    let center_lat = f64::midpoint(bbox.min().y, bbox.max().y);
    let (dlon, dlat) = cell_size_degrees(cell_size_m, center_lat);

    let cols = steps_covering(width, dlon);
    let rows = steps_covering(height, dlat);
    log::debug!(
        "Fishnet candidate grid: {cols} x {rows} cells of {cell_size_m} m over bbox \
         [{:.4}, {:.4}, {:.4}, {:.4}]",
        bbox.min().x,
        bbox.min().y,
        bbox.max().x,
        bbox.max().y
    );

    let mut cells = Vec::new();

    for col in 0..cols {
        for row in 0..rows {
            let x0 = (col as f64).mul_add(dlon, bbox.min().x);
            let y0 = (row as f64).mul_add(dlat, bbox.min().y);
            let square = Rect::new(
                coord! { x: x0, y: y0 },
                coord! { x: x0 + dlon, y: y0 + dlat },
            )
            .to_polygon();

            let clipped = boundary.intersection(&square);
            if clipped.0.is_empty() || clipped.unsigned_area() <= 0.0 {
                continue;
            }

            let centroid = clipped.centroid().map_or(
                GeoPoint {
                    latitude: y0 + dlat / 2.0,
                    longitude: x0 + dlon / 2.0,
                },
                |c| GeoPoint {
                    latitude: c.y(),
                    longitude: c.x(),
                },
            );

            cells.push(GridCell {
                cell_id: format!("CELL_{:04}", cells.len() + 1),
                row,
                col,
                area_m2: clipped.geodesic_area_unsigned(),
                centroid,
                polygon: clipped,
                business_ids: Vec::new(),
                business_count: 0,
            });
        }
    }

    log::info!(
        "Fishnet: {} of {} candidate cells intersect the study area",
        cells.len(),
        cols * rows
    );

    Ok(cells)
}
