//! pharmloc: rank pharmacies by distance to a position.

mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use output::Status;
use pharmloc_geo::{
    annotate_ranking, distance_km, format_distance, nearest, rank_by_proximity,
    reference_coordinate, within_radius, AccuracyLevel, Coordinate, FixedSource, GeoRecord,
    GeoTagged, LocationError, Position, UnavailableSource,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pharmloc")]
#[command(about = "Rank pharmacies by distance to a position")]
#[command(version)]
struct Cli {
    /// Path to a config file (default: .pharmloc.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging for the pharmloc crates
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Great-circle distance between two coordinates
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lng1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lng2: f64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Format a distance in kilometers as a UI label
    Format {
        #[arg(allow_negative_numbers = true)]
        km: f64,
    },
    /// Rank backend pharmacy rows (JSON array) by distance
    Rank {
        /// JSON file with the rows
        file: PathBuf,
        /// User latitude; without a position the rows keep their order
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// User longitude
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
        /// Fix accuracy in meters, reported alongside the ranking
        #[arg(long)]
        accuracy: Option<f64>,
        /// Keep at most N results
        #[arg(long)]
        limit: Option<usize>,
        /// Only keep pharmacies within this many kilometers
        #[arg(long)]
        radius: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Accuracy level of a position fix
    Accuracy {
        /// Accuracy radius in meters
        meters: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let mut logging = config.schema.logging.clone();
    if cli.verbose {
        logging = logging.verbose();
    }
    pharmloc_telemetry::init_with_config(&logging)?;

    if let Some(path) = &config.path {
        tracing::debug!(path = %path.display(), "Loaded config");
    }

    match cli.command {
        Commands::Distance { lat1, lng1, lat2, lng2, json } => {
            let from = Coordinate::new(lat1, lng1);
            let to = Coordinate::new(lat2, lng2);
            if !from.is_valid() || !to.is_valid() {
                Status::warning(
                    "Coordinates outside [-90, 90] x [-180, 180]; result is meaningless",
                );
            }

            let km = distance_km(&from, &to);
            if json {
                let out = serde_json::json!({
                    "distanceKm": km,
                    "distanceLabel": format_distance(km),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{:.3} km ({})", km, format_distance(km));
            }
        }

        Commands::Format { km } => {
            println!("{}", format_distance(km));
        }

        Commands::Rank { file, lat, lng, accuracy, limit, radius, json } => {
            let position = lat
                .zip(lng)
                .map(|(lat, lng)| Position::new(lat, lng, accuracy.unwrap_or(f64::NAN)));
            let options = RankOptions {
                limit: limit.or(config.schema.ranking.max_results),
                radius_km: radius.or(config.schema.ranking.radius_km),
            };
            run_rank(&file, position, options, &config, json).await?;
        }

        Commands::Accuracy { meters } => {
            let level = AccuracyLevel::classify(meters, &config.schema.accuracy);
            println!("{}", level.label());
        }
    }

    Ok(())
}

struct RankOptions {
    limit: Option<usize>,
    radius_km: Option<f64>,
}

async fn run_rank(
    file: &Path,
    position: Option<Position>,
    options: RankOptions,
    config: &Config,
    json: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let records: Vec<GeoRecord> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of objects", file.display()))?;

    let reference = match position {
        Some(position) => reference_coordinate(&FixedSource::new(position)).await,
        None => {
            let source = UnavailableSource::new(LocationError::PositionUnavailable);
            reference_coordinate(&source).await
        }
    };

    let ranked = {
        pharmloc_telemetry::timed_span!("rank", records = records.len());
        match (options.radius_km, options.limit) {
            (Some(radius), limit) => {
                let mut ranked = within_radius(reference.as_ref(), &records, radius);
                ranked.truncate(limit.unwrap_or(usize::MAX));
                ranked
            }
            (None, Some(limit)) => nearest(reference.as_ref(), &records, limit),
            (None, None) => rank_by_proximity(reference.as_ref(), &records),
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&annotate_ranking(&ranked))?);
        return Ok(());
    }

    match (reference, position) {
        (Some(coord), Some(position)) => {
            let located = records.iter().filter(|r| r.coordinate().is_some()).count();
            Status::header(&format!(
                "{} pharmacies near ({:.5}, {:.5})",
                ranked.len(),
                coord.latitude,
                coord.longitude
            ));
            if position.accuracy_meters.is_finite() {
                Status::info(&format!(
                    "Accuracy: {} ({:.0} m)",
                    position.accuracy_level(&config.schema.accuracy),
                    position.accuracy_meters
                ));
            }
            if located < records.len() {
                let unlocated = records.len() - located;
                Status::info(&format!("{} without coordinates, listed last", unlocated));
            }
        }
        _ => {
            Status::header(&format!("{} pharmacies", ranked.len()));
            Status::warning("No usable position; listing in original order");
        }
    }

    output::print_ranking(&ranked);
    Ok(())
}
