#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pipeline entry point for the barrio map data build.
//!
//! Runs the full chain over the raw inputs: geocode the business
//! directory, build the fishnet grid over the study-area boundary,
//! assign points to cells, and write the output files the site loads.

mod input;

use std::path::PathBuf;

use barrio_map_fishnet::{assign_points, build_fishnet};
use barrio_map_generate::{
    coordinates::coordinate_index,
    fishnet::{fishnet_feature_collection, occupied_cells_feature_collection},
    points::points_feature_collection,
    stats::summarize,
    write_json,
};
use barrio_map_geocode::{Calibration, Geocoder};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser)]
#[command(name = "barrio_map_cli", about = "Barrio map geocoding and fishnet pipeline")]
struct Cli {
    /// Business directory JSON (bare array or `negocios` envelope)
    #[arg(long)]
    businesses: PathBuf,

    /// Study-area boundary GeoJSON
    #[arg(long)]
    boundary: PathBuf,

    /// Output directory for the generated files
    #[arg(long)]
    out_dir: PathBuf,

    /// Grid cell edge length in meters
    #[arg(long, default_value = "50.0")]
    cell_size_m: f64,

    /// Calibration TOML overriding the built-in San José table
    #[arg(long)]
    calibration: Option<PathBuf>,

    /// RNG seed for reproducible fallback jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Boundary feature id to use as the study area
    #[arg(long, default_value = "zona_estudio_completa")]
    study_area_id: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let calibration = match &cli.calibration {
        Some(path) => Calibration::from_path(path)?,
        None => Calibration::barrio_san_jose(),
    };

    let businesses = input::load_businesses(&cli.businesses)?;
    let boundary = input::load_boundary(&cli.boundary, &cli.study_area_id)?;

    let mut rng = cli.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let geocoder = Geocoder::new(calibration);
    let records = geocoder.geocode_all(&businesses, &mut rng);

    let mut cells = build_fishnet(&boundary, cli.cell_size_m)?;
    log::info!("Built fishnet with {} cells", cells.len());

    let assignment = assign_points(&mut cells, &records);
    log::info!(
        "Assigned {} of {} records to {} cells",
        assignment.assigned,
        records.len(),
        assignment.cells_with_points
    );

    std::fs::create_dir_all(&cli.out_dir)?;

    write_json(
        &cli.out_dir.join("negocios_geocodificados.geojson"),
        &points_feature_collection(&records),
    )?;
    write_json(
        &cli.out_dir.join("fishnet.geojson"),
        &fishnet_feature_collection(&cells, cli.cell_size_m, &assignment),
    )?;
    write_json(
        &cli.out_dir.join("fishnet_negocios.geojson"),
        &occupied_cells_feature_collection(&cells, &records),
    )?;
    write_json(
        &cli.out_dir.join("coordenadas_negocios.json"),
        &coordinate_index(&records),
    )?;
    write_json(
        &cli.out_dir.join("estadisticas_integracion.json"),
        &summarize(&cells, &records, &assignment),
    )?;

    Ok(())
}
