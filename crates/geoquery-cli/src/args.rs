use clap::{Args, Parser, Subcommand, ValueEnum};
use geoquery_core::CityFilter;
use std::path::PathBuf;

/// CLI arguments for geoquery-cli
#[derive(Debug, Parser)]
#[command(
    name = "geoquery",
    version,
    about = "Nearest, radius and bounding-box queries over a city dataset"
)]
pub struct CliArgs {
    /// Dataset to load: .json, .json.gz or a .bin snapshot (default: bundled cities.json)
    #[arg(short = 'i', long = "input", global = true)]
    pub input: Option<PathBuf>,

    /// JSON file with query defaults (default_limit, default_radius_km, max_radius_km)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Attribute filters shared by every query command.
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Only cities whose name contains this text (accent/case-insensitive)
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Only cities whose country contains this text
    #[arg(long, global = true)]
    pub country: Option<String>,

    /// Only cities whose region contains this text
    #[arg(long, global = true)]
    pub region: Option<String>,

    #[arg(long, global = true)]
    pub min_population: Option<u64>,

    #[arg(long, global = true)]
    pub max_population: Option<u64>,

    #[arg(long, global = true, allow_negative_numbers = true)]
    pub min_founded_year: Option<i32>,

    #[arg(long, global = true, allow_negative_numbers = true)]
    pub max_founded_year: Option<i32>,

    /// Only capital cities
    #[arg(long, global = true)]
    pub capitals_only: bool,
}

impl FilterArgs {
    pub fn to_city_filter(&self) -> CityFilter {
        CityFilter {
            name: self.name.clone(),
            country: self.country.clone(),
            region: self.region.clone(),
            min_population: self.min_population,
            max_population: self.max_population,
            min_founded_year: self.min_founded_year,
            max_founded_year: self.max_founded_year,
            is_capital: self.capitals_only.then_some(true),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show aggregate statistics for the loaded dataset
    Stats,

    /// List countries with city counts and population totals
    Countries,

    /// Find the k nearest cities to a point
    Nearest {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Number of results (default from config, usually 10); k <= 0 returns nothing
        #[arg(short = 'k', long = "limit", allow_negative_numbers = true)]
        k: Option<i64>,
        /// Print how long the query took
        #[arg(long)]
        timing: bool,
    },

    /// Find every city within a radius of a point
    Radius {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Radius in kilometres (default from config, usually 100)
        #[arg(short = 'r', long = "radius-km", allow_negative_numbers = true)]
        radius_km: Option<f64>,
    },

    /// Find every city inside a latitude/longitude rectangle
    Bbox {
        #[arg(long, allow_negative_numbers = true)]
        min_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        min_lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        max_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        max_lon: f64,
    },

    /// Look up cities by name or country (accent/case-insensitive)
    Search {
        /// Text to look for; exact name matches are listed first
        query: String,
    },

    /// Export the (filtered) dataset as a GeoJSON FeatureCollection
    Geojson,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn negative_coordinates_parse() {
        let args = CliArgs::try_parse_from([
            "geoquery", "nearest", "--lat", "53.35", "--lon", "-6.26", "-k", "3",
        ])
        .unwrap();
        match args.command {
            Commands::Nearest { lat, lon, k, timing } => {
                assert_eq!((lat, lon, k, timing), (53.35, -6.26, Some(3), false));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_filters_after_subcommand() {
        let args = CliArgs::try_parse_from([
            "geoquery",
            "radius",
            "--lat",
            "53",
            "--lon",
            "-6",
            "--capitals-only",
            "--country",
            "ireland",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.format, OutputFormat::Json);
        let f = args.filter.to_city_filter();
        assert_eq!(f.is_capital, Some(true));
        assert_eq!(f.country.as_deref(), Some("ireland"));
        assert!(FilterArgs::default().to_city_filter().is_empty());
    }

    #[test]
    fn search_takes_positional_query() {
        let args = CliArgs::try_parse_from(["geoquery", "search", "São Paulo", "--capitals-only"])
            .unwrap();
        match args.command {
            Commands::Search { query } => assert_eq!(query, "São Paulo"),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(args.filter.capitals_only);
        assert!(CliArgs::try_parse_from(["geoquery", "search"]).is_err());
    }
}
