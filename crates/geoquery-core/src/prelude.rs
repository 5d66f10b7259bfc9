// crates/geoquery-core/src/prelude.rs

//! Common imports: `use geoquery_core::prelude::*;`

pub use crate::engine::QueryEngine;
pub use crate::error::{GeoError, Result};
pub use crate::filter::CityFilter;
pub use crate::geo::{distance_km, distance_miles, BoundingBox, GeoPoint};
pub use crate::index::{LocatedEntity, SpatialIndex};
pub use crate::loader::CityIndex;
pub use crate::model::{City, DefaultBackend, DefaultCity};
pub use crate::traits::{AcceptAll, EntityFilter, GeoBackend, NameMatch};
pub use crate::CityEngine;
