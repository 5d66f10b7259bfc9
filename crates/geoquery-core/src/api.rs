// crates/geoquery-core/src/api.rs

//! Flat, borrow-based JSON views over city query results.
//!
//! The engine envelopes serialize the raw `LocatedEntity<City>` nesting;
//! these views reshape an entity into the flat record HTTP clients expect
//! and render GeoJSON.

use crate::engine::{BoundingBoxResponse, NearestResponse, RadiusResponse, RankedEntity};
use crate::geo::GeoPoint;
use crate::index::{EntityId, LocatedEntity};
use crate::model::City;
use crate::traits::GeoBackend;
use serde::Serialize;
use serde_json::{json, Value};

/// One city as a flat JSON object.
#[derive(Debug, Serialize)]
pub struct CityView<'a> {
    pub id: EntityId,
    pub name: &'a str,
    pub country: &'a str,
    pub region: Option<&'a str>,
    pub population: u64,
    pub is_capital: bool,
    pub founded_year: Option<i32>,
    pub timezone: Option<&'a str>,
    pub population_category: &'static str,
    pub coordinates: GeoPoint,
}

impl<'a> CityView<'a> {
    pub fn from_entity<B: GeoBackend>(e: &'a LocatedEntity<City<B>>) -> Self {
        let c = &e.payload;
        Self {
            id: e.id,
            name: c.name(),
            country: c.country(),
            region: c.region(),
            population: c.population,
            is_capital: c.is_capital,
            founded_year: c.founded_year,
            timezone: c.timezone(),
            population_category: c.population_category(),
            coordinates: e.location,
        }
    }
}

/// A city plus its rank and (already rounded) distances.
#[derive(Debug, Serialize)]
pub struct RankedCityView<'a> {
    pub rank: usize,
    #[serde(flatten)]
    pub city: CityView<'a>,
    pub distance_km: f64,
    pub distance_miles: f64,
}

impl<'a> RankedCityView<'a> {
    pub fn from_ranked<B: GeoBackend>(r: &'a RankedEntity<City<B>>) -> Self {
        Self {
            rank: r.rank,
            city: CityView::from_entity(&r.entity),
            distance_km: r.distance_km,
            distance_miles: r.distance_miles,
        }
    }
}

fn ranked<B: GeoBackend>(results: &[RankedEntity<City<B>>]) -> Vec<RankedCityView<'_>> {
    results.iter().map(RankedCityView::from_ranked).collect()
}

/// `{search_point, total_found, results: [...]}` with flat city records.
pub fn nearest_json<B: GeoBackend>(resp: &NearestResponse<City<B>>) -> Value {
    json!({
        "search_point": resp.search_point,
        "total_found": resp.total_found,
        "results": ranked(&resp.results),
    })
}

pub fn radius_json<B: GeoBackend>(resp: &RadiusResponse<City<B>>) -> Value {
    json!({
        "search_point": resp.search_point,
        "radius_km": resp.radius_km,
        "total_found": resp.total_found,
        "results": ranked(&resp.results),
    })
}

pub fn bbox_json<B: GeoBackend>(resp: &BoundingBoxResponse<City<B>>) -> Value {
    let cities: Vec<CityView<'_>> = resp.entities.iter().map(CityView::from_entity).collect();
    json!({
        "bbox": resp.bbox,
        "total_found": resp.total_found,
        "cities": cities,
    })
}

/// GeoJSON `FeatureCollection`; point coordinates are `[lon, lat]`.
pub fn to_feature_collection<'a, B, I>(entities: I) -> Value
where
    B: GeoBackend,
    I: IntoIterator<Item = &'a LocatedEntity<City<B>>>,
{
    let features: Vec<Value> = entities
        .into_iter()
        .map(|e| {
            let c = &e.payload;
            json!({
                "type": "Feature",
                "id": e.id,
                "geometry": {
                    "type": "Point",
                    "coordinates": [e.location.lon(), e.location.lat()],
                },
                "properties": {
                    "name": c.name(),
                    "country": c.country(),
                    "region": c.region(),
                    "population": c.population,
                    "is_capital": c.is_capital,
                    "founded_year": c.founded_year,
                    "population_category": c.population_category(),
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}
