//! Summary statistics over the geocoding and assignment results.

use std::collections::BTreeMap;

use barrio_map_fishnet::AssignmentStats;
use barrio_map_geo_models::{GeocodedRecord, GridCell, PrecisionTier};
use serde::Serialize;

/// Stable string label for a precision tier, used in output properties
/// and statistics keys.
#[must_use]
pub const fn tier_label(tier: PrecisionTier) -> &'static str {
    match tier {
        PrecisionTier::Exact => "exact",
        PrecisionTier::Interpolated => "interpolated",
        PrecisionTier::Approximate => "approximate",
        PrecisionTier::AreaFallback => "areaFallback",
    }
}

/// Per-tier record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecisionBreakdown {
    /// Records snapped to a verified reference point.
    pub exact: usize,
    /// Records interpolated using both axis numbers.
    pub interpolated: usize,
    /// Records interpolated from the primary number only.
    pub approximate: usize,
    /// Records placed by the centroid-plus-jitter fallback.
    pub area_fallback: usize,
}

impl PrecisionBreakdown {
    /// Tallies the tiers across a record collection.
    #[must_use]
    pub fn from_records(records: &[GeocodedRecord]) -> Self {
        let mut breakdown = Self::default();
        for record in records {
            match record.precision_tier {
                PrecisionTier::Exact => breakdown.exact += 1,
                PrecisionTier::Interpolated => breakdown.interpolated += 1,
                PrecisionTier::Approximate => breakdown.approximate += 1,
                PrecisionTier::AreaFallback => breakdown.area_fallback += 1,
            }
        }
        breakdown
    }
}

/// One of the busiest cells, with example business names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCell {
    /// Cell id.
    pub cell_id: String,
    /// Assigned business count.
    pub count: usize,
    /// Up to three example business names.
    pub examples: Vec<String>,
}

/// The full integration summary written alongside the fishnet output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSummary {
    /// Total input records.
    pub total_businesses: usize,
    /// Records assigned to a cell.
    pub assigned: usize,
    /// Records outside every cell.
    pub unassigned: usize,
    /// Total grid cells.
    pub cells_total: usize,
    /// Cells with at least one business.
    pub cells_with_businesses: usize,
    /// Cells with none.
    pub empty_cells: usize,
    /// Mean businesses per occupied cell.
    pub average_per_occupied_cell: f64,
    /// Largest per-cell count.
    pub max_per_cell: usize,
    /// Per-tier distribution of the geocoded records.
    pub by_precision: PrecisionBreakdown,
    /// The ten busiest cells.
    pub top_cells: Vec<TopCell>,
}

/// Builds the integration summary from the assignment outcome.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(
    cells: &[GridCell],
    records: &[GeocodedRecord],
    assignment: &AssignmentStats,
) -> AssignmentSummary {
    let names: BTreeMap<&str, &str> = records
        .iter()
        .map(|r| (r.id.as_str(), r.name.as_str()))
        .collect();

    let mut occupied: Vec<&GridCell> = cells.iter().filter(|c| c.business_count > 0).collect();
    occupied.sort_by(|a, b| b.business_count.cmp(&a.business_count));

    let top_cells = occupied
        .iter()
        .take(10)
        .map(|cell| TopCell {
            cell_id: cell.cell_id.clone(),
            count: cell.business_count,
            examples: cell
                .business_ids
                .iter()
                .take(3)
                .filter_map(|id| names.get(id.as_str()).map(|&n| n.to_string()))
                .collect(),
        })
        .collect();

    let average_per_occupied_cell = if assignment.cells_with_points == 0 {
        0.0
    } else {
        assignment.assigned as f64 / assignment.cells_with_points as f64
    };

    AssignmentSummary {
        total_businesses: records.len(),
        assigned: assignment.assigned,
        unassigned: assignment.unassigned_ids.len(),
        cells_total: cells.len(),
        cells_with_businesses: assignment.cells_with_points,
        empty_cells: cells.len() - assignment.cells_with_points,
        average_per_occupied_cell,
        max_per_cell: assignment.max_per_cell,
        by_precision: PrecisionBreakdown::from_records(records),
        top_cells,
    }
}
