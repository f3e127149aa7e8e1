#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fishnet grid construction and spatial aggregation.
//!
//! Partitions the study-area polygon into fixed-size square cells
//! clipped to the boundary ([`build_fishnet`]), then buckets geocoded
//! business points into those cells with an R-tree-accelerated
//! point-in-polygon join ([`assign_points`]).

pub mod assign;
pub mod grid;

pub use assign::{AssignmentStats, assign_points, density_per_hectare};
pub use grid::build_fishnet;

use thiserror::Error;

/// Errors from fishnet construction.
///
/// These represent API misuse, not bad input data: a degenerate
/// boundary yields an empty grid, never an error.
#[derive(Debug, Error)]
pub enum FishnetError {
    /// The requested cell size is not a positive finite number.
    #[error("Invalid cell size: {0} (must be a positive number of meters)")]
    InvalidCellSize(f64),
}
