//! geoquery-cli
//! ============
//!
//! Command-line interface for the `geoquery-core` proximity query engine.
//!
//! This crate primarily provides a binary (`geoquery-cli`). The library
//! target only exists so docs.rs renders this overview.
//!
//! Basic usage:
//!
//! ```text
//! geoquery-cli --help
//! geoquery-cli stats
//! geoquery-cli nearest --lat 53.35 --lon -6.26 -k 5
//! geoquery-cli radius --lat 53 --lon -6 --radius-km 150 --country ireland
//! geoquery-cli bbox --min-lat 51 --min-lon -11 --max-lat 56 --max-lon -5 --format json
//! geoquery-cli search krakow
//! geoquery-cli geojson --capitals-only > capitals.geojson
//! ```
//!
//! For programmatic access use the [`geoquery-core`] crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
