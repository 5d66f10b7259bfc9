// crates/geoquery-core/src/lib.rs

//! # geoquery-core
//!
//! In-memory proximity queries over geolocated city records.
//!
//! Three layers:
//! - [`geo`]: validated points, bounding boxes and haversine distances
//! - [`index`]: an immutable [`SpatialIndex`] snapshot answering nearest,
//!   radius and bounding-box queries
//! - [`engine`]: [`QueryEngine`], which validates requests, runs them on the
//!   current snapshot and builds ranked responses
//!
//! On top sit the [`City`] payload, [`CityFilter`], snapshot statistics,
//! folded name [`search`], the dataset [`loader`] and (with `json`) flat
//! JSON/GeoJSON views in [`api`].
//!
//! ```rust
//! use geoquery_core::prelude::*;
//!
//! let engine = QueryEngine::new();
//! engine.load(vec![
//!     (1, 53.3498, -6.2603, "Dublin"),
//!     (2, 51.5074, -0.1278, "London"),
//! ])?;
//!
//! let resp = engine.find_nearest(53.0, -6.0, Some(1), &AcceptAll)?;
//! assert_eq!(resp.results[0].entity.payload, "Dublin");
//! # Ok::<(), geoquery_core::GeoError>(())
//! ```

#[cfg(feature = "json")]
pub mod api;
pub mod common;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod geo;
pub mod index;
pub mod loader;
pub mod model;
pub mod prelude;
pub mod search;
pub mod text;
pub mod traits;

pub use crate::common::{CityStats, CountrySummary};
pub use crate::config::QueryConfig;
pub use crate::engine::{
    BoundingBoxResponse, NearestResponse, QueryEngine, RadiusResponse, RankedEntity,
};
pub use crate::error::{GeoError, Result};
pub use crate::filter::CityFilter;
pub use crate::geo::{BoundingBox, GeoPoint};
pub use crate::index::{
    EntityId, LocatedEntity, Neighbor, SpatialIndex, MAX_ENTITIES, MAX_RADIUS_KM,
};
pub use crate::loader::CityIndex;
pub use crate::model::{City, CityEntity, CityRaw, DefaultBackend, DefaultCity};

/// Query engine over the default city payload.
pub type CityEngine = QueryEngine<DefaultCity>;
