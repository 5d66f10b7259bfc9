//! geoquery-cli: command-line interface for geoquery-core
//!
//! Runs proximity queries against a city dataset from the terminal.
//!
//! Usage examples
//! --------------
//!
//! - Dataset summary
//!   $ geoquery stats
//!
//! - Five nearest capitals to a point
//!   $ geoquery nearest --lat 53.0 --lon -6.0 -k 5 --capitals-only
//!
//! - Everything within 250 km, as JSON
//!   $ geoquery radius --lat 48.85 --lon 2.35 --radius-km 250 --format json
//!
//! - Cities inside a box
//!   $ geoquery bbox --min-lat 51 --min-lon -11 --max-lat 56 --max-lon -5
//!
//! - Name or country lookup
//!   $ geoquery search zurich
//!
//! Data source
//! -----------
//!
//! Without `--input` the CLI uses the dataset bundled with `geoquery-core`.
//! A JSON input gets a binary snapshot cached next to it for fast
//! subsequent runs. Logging goes to stderr; set `RUST_LOG=debug` to see
//! load and cache events.
mod args;

use crate::args::{CliArgs, Commands, OutputFormat};
use anyhow::Context;
use clap::Parser;
use geoquery_core::api;
use geoquery_core::{CityEngine, CityIndex, QueryConfig, RankedEntity};
use geoquery_core::{DefaultCity, GeoPoint};
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => QueryConfig::default(),
    };
    let index = match &args.input {
        Some(path) => load_index(path)?,
        None => CityIndex::load_default()
            .context("loading bundled dataset")?
            .clone(),
    };
    tracing::debug!(cities = index.len(), "dataset ready");

    let engine = CityEngine::from_index(index).with_config(config)?;
    let filter = args.filter.to_city_filter();
    let json = args.format == OutputFormat::Json;

    match args.command {
        Commands::Stats => {
            let stats = engine.snapshot().stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("City statistics:");
                println!("  Cities: {}", stats.total_cities);
                println!("  Total population: {}", stats.total_population);
                println!("  Countries: {}", stats.countries_count);
                println!("  Capitals: {}", stats.capitals_count);
                println!("  Average population: {:.0}", stats.average_population);
                println!("  Largest: {}", stats.largest_city);
                println!("  Smallest: {}", stats.smallest_city);
            }
        }

        Commands::Countries => {
            let countries = engine.snapshot().countries();
            if json {
                println!("{}", serde_json::to_string_pretty(&countries)?);
            } else {
                for c in countries {
                    println!(
                        "{}: {} cities, population {}, {} capital(s)",
                        c.country, c.city_count, c.total_population, c.capitals_count
                    );
                }
            }
        }

        Commands::Nearest { lat, lon, k, timing } => {
            let started = Instant::now();
            let resp = engine.find_nearest(lat, lon, k, &filter)?;
            let elapsed = started.elapsed();

            if json {
                println!("{}", serde_json::to_string_pretty(&api::nearest_json(&resp))?);
            } else {
                print_header("Nearest to", resp.search_point, resp.total_found);
                print_ranked(&resp.results);
            }
            if timing {
                eprintln!("query took {:.3} ms", elapsed.as_secs_f64() * 1000.0);
            }
        }

        Commands::Radius {
            lat,
            lon,
            radius_km,
        } => {
            let resp = engine.find_within_radius(lat, lon, radius_km, &filter)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&api::radius_json(&resp))?);
            } else {
                let title = format!("Within {} km of", resp.radius_km);
                print_header(&title, resp.search_point, resp.total_found);
                print_ranked(&resp.results);
            }
        }

        Commands::Bbox {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        } => {
            let resp = engine.find_within_bounding_box(min_lat, min_lon, max_lat, max_lon, &filter)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&api::bbox_json(&resp))?);
            } else {
                println!(
                    "Inside [{}, {}] .. [{}, {}]: {} found",
                    min_lat, min_lon, max_lat, max_lon, resp.total_found
                );
                for e in &resp.entities {
                    let c = &e.payload;
                    println!(
                        "  {}, {} ({:.4}, {:.4})",
                        c.name(),
                        c.country(),
                        e.location.lat(),
                        e.location.lon()
                    );
                }
            }
        }

        Commands::Search { query } => {
            let snapshot = engine.snapshot();
            let hits: Vec<_> = snapshot
                .search(&query)
                .into_iter()
                .filter(|e| filter.matches(&e.payload))
                .collect();
            if json {
                let views: Vec<_> = hits.iter().map(|e| api::CityView::from_entity(e)).collect();
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else {
                println!("Matches for {:?}: {} found", query, hits.len());
                for e in hits {
                    let c = &e.payload;
                    println!(
                        "  {}, {} ({:.4}, {:.4})  [{}]",
                        c.name(),
                        c.country(),
                        e.location.lat(),
                        e.location.lon(),
                        c.population_category()
                    );
                }
            }
        }

        Commands::Geojson => {
            let snapshot = engine.snapshot();
            let features = api::to_feature_collection(
                snapshot
                    .entities()
                    .iter()
                    .filter(|e| filter.matches(&e.payload)),
            );
            println!("{}", serde_json::to_string_pretty(&features)?);
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` overrides the
/// default `warn` level.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path) -> anyhow::Result<QueryConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    QueryConfig::from_json_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn load_index(path: &Path) -> anyhow::Result<CityIndex> {
    let is_json = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".json"));
    let index = if is_json {
        CityIndex::load_cached(path)
    } else {
        CityIndex::load_from_path(path)
    };
    index.with_context(|| format!("loading dataset {}", path.display()))
}

fn print_header(title: &str, point: GeoPoint, total: usize) {
    println!(
        "{} ({:.4}, {:.4}): {} found",
        title,
        point.lat(),
        point.lon(),
        total
    );
}

fn print_ranked(results: &[RankedEntity<DefaultCity>]) {
    for r in results {
        let c = &r.entity.payload;
        println!(
            "  {:>3}. {}, {}  {:.2} km ({:.2} mi)  [{}]",
            r.rank,
            c.name(),
            c.country(),
            r.distance_km,
            r.distance_miles,
            c.population_category()
        );
    }
}
