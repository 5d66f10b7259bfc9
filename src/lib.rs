//! Umbrella crate for the workspace; re-exports `geoquery-core` so the
//! demos can `use geoquery_rs::prelude::*`.
pub use geoquery_core::*;
