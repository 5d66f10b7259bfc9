// crates/geoquery-core/src/common.rs

//! Aggregate statistics over a city snapshot.
//!
//! Computed on demand from [`SpatialIndex::entities`], so the numbers always
//! describe exactly the snapshot they were taken from.

use crate::index::SpatialIndex;
use crate::model::City;
use crate::traits::GeoBackend;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Placeholder label for `largest_city` / `smallest_city` on an empty snapshot.
pub const NO_CITY: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityStats {
    pub total_cities: usize,
    pub total_population: u64,
    pub countries_count: usize,
    pub capitals_count: usize,
    pub average_population: f64,
    /// `"Name, Country"` of the most populous city.
    pub largest_city: String,
    /// `"Name, Country"` of the least populous city.
    pub smallest_city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySummary {
    pub country: String,
    pub city_count: usize,
    pub total_population: u64,
    pub capitals_count: usize,
}

impl<B: GeoBackend> SpatialIndex<City<B>> {
    pub fn stats(&self) -> CityStats {
        let cities = self.entities().iter().map(|e| &e.payload);

        let mut total_population = 0u64;
        let mut capitals_count = 0usize;
        let mut countries = HashSet::new();
        let mut largest: Option<&City<B>> = None;
        let mut smallest: Option<&City<B>> = None;

        for c in cities {
            total_population = total_population.saturating_add(c.population);
            capitals_count += usize::from(c.is_capital);
            countries.insert(c.country());
            // strict comparisons: ties keep the first city seen
            if largest.map_or(true, |l| c.population > l.population) {
                largest = Some(c);
            }
            if smallest.map_or(true, |s| c.population < s.population) {
                smallest = Some(c);
            }
        }

        let total_cities = self.len();
        let average_population = if total_cities == 0 {
            0.0
        } else {
            total_population as f64 / total_cities as f64
        };
        let label = |c: Option<&City<B>>| c.map_or_else(|| NO_CITY.to_string(), City::label);

        CityStats {
            total_cities,
            total_population,
            countries_count: countries.len(),
            capitals_count,
            average_population,
            largest_city: label(largest),
            smallest_city: label(smallest),
        }
    }

    /// Per-country rollup, sorted by country name.
    pub fn countries(&self) -> Vec<CountrySummary> {
        let mut by_country: BTreeMap<&str, CountrySummary> = BTreeMap::new();
        for e in self.entities() {
            let c = &e.payload;
            let entry = by_country
                .entry(c.country())
                .or_insert_with(|| CountrySummary {
                    country: c.country().to_string(),
                    city_count: 0,
                    total_population: 0,
                    capitals_count: 0,
                });
            entry.city_count += 1;
            entry.total_population = entry.total_population.saturating_add(c.population);
            entry.capitals_count += usize::from(c.is_capital);
        }
        by_country.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DefaultBackend, DefaultCity};

    fn snapshot() -> SpatialIndex<DefaultCity> {
        let mk = |name: &str, country: &str, pop: u64, capital: bool| {
            let mut c = DefaultCity::named(name, country);
            c.population = pop;
            c.is_capital = capital;
            c
        };
        SpatialIndex::build(vec![
            (1, 53.3498, -6.2603, mk("Dublin", "Ireland", 1_400_000, true)),
            (2, 51.8985, -8.4756, mk("Cork", "Ireland", 210_000, false)),
            (3, 51.5074, -0.1278, mk("London", "United Kingdom", 9_000_000, true)),
            (4, 54.5973, -5.9301, mk("Belfast", "United Kingdom", 210_000, false)),
        ])
        .unwrap()
    }

    #[test]
    fn stats_over_snapshot() {
        let s = snapshot().stats();
        assert_eq!(s.total_cities, 4);
        assert_eq!(s.total_population, 10_820_000);
        assert_eq!(s.countries_count, 2);
        assert_eq!(s.capitals_count, 2);
        assert_eq!(s.average_population, 2_705_000.0);
        assert_eq!(s.largest_city, "London, United Kingdom");
        // Cork and Belfast tie; Cork was loaded first
        assert_eq!(s.smallest_city, "Cork, Ireland");
    }

    #[test]
    fn stats_on_empty_snapshot() {
        let s = SpatialIndex::<City<DefaultBackend>>::new().stats();
        assert_eq!(s.total_cities, 0);
        assert_eq!(s.average_population, 0.0);
        assert_eq!(s.largest_city, NO_CITY);
        assert_eq!(s.smallest_city, NO_CITY);
    }

    #[test]
    fn countries_are_sorted_rollups() {
        let list = snapshot().countries();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].country, "Ireland");
        assert_eq!(list[0].city_count, 2);
        assert_eq!(list[0].total_population, 1_610_000);
        assert_eq!(list[0].capitals_count, 1);
        assert_eq!(list[1].country, "United Kingdom");
        assert_eq!(list[1].capitals_count, 1);
    }
}
