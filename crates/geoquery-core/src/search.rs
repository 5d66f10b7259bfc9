// crates/geoquery-core/src/search.rs

//! Free-text lookups over a city snapshot.
//!
//! All matching is folded (see [`crate::text::fold_key`]), so `"zurich"`
//! finds `Zürich` and `"KRAKOW"` finds `Kraków`. Results borrow from the
//! snapshot and keep insertion order within each match tier.

use crate::index::SpatialIndex;
use crate::model::{City, CityEntity};
use crate::text::{contains_folded, fold_key};
use crate::traits::{GeoBackend, NameMatch};

impl<B: GeoBackend> SpatialIndex<City<B>> {
    /// First city whose name equals `name` after folding.
    pub fn find_by_name(&self, name: &str) -> Option<&CityEntity<B>> {
        self.entities().iter().find(|e| e.payload.is_named(name))
    }

    /// Cities whose name contains `substr`. An empty query matches nothing.
    pub fn find_cities_by_substring(&self, substr: &str) -> Vec<&CityEntity<B>> {
        if fold_key(substr).is_empty() {
            return Vec::new();
        }
        self.entities()
            .iter()
            .filter(|e| e.payload.name_contains(substr))
            .collect()
    }

    /// Ranked free-text search over names and countries.
    ///
    /// Exact name matches come first, then name substrings, then cities
    /// whose country contains the query. Each city appears at most once.
    pub fn search(&self, query: &str) -> Vec<&CityEntity<B>> {
        if fold_key(query).is_empty() {
            return Vec::new();
        }

        let mut exact = Vec::new();
        let mut partial = Vec::new();
        let mut by_country = Vec::new();
        for e in self.entities() {
            let c = &e.payload;
            if c.is_named(query) {
                exact.push(e);
            } else if c.name_contains(query) {
                partial.push(e);
            } else if contains_folded(c.country(), query) {
                by_country.push(e);
            }
        }

        exact.extend(partial);
        exact.extend(by_country);
        exact
    }
}

#[cfg(test)]
mod tests {
    use crate::index::SpatialIndex;
    use crate::model::DefaultCity;

    fn snapshot() -> SpatialIndex<DefaultCity> {
        SpatialIndex::build(vec![
            (1, 53.3498, -6.2603, DefaultCity::named("Dublin", "Ireland")),
            (2, 51.8985, -8.4756, DefaultCity::named("Cork", "Ireland")),
            (3, 47.3769, 8.5417, DefaultCity::named("Zürich", "Switzerland")),
            (4, 37.7749, -122.4194, DefaultCity::named("San Jose", "United States")),
            (5, 9.9281, -84.0907, DefaultCity::named("San José", "Costa Rica")),
            (6, 37.3382, -121.8863, DefaultCity::named("South San Jose Hills", "United States")),
            (7, 52.2297, 21.0122, DefaultCity::named("Warsaw", "Poland")),
        ])
        .unwrap()
    }

    fn names<'a>(hits: &[&'a crate::model::CityEntity]) -> Vec<&'a str> {
        hits.iter().map(|e| e.payload.name()).collect()
    }

    #[test]
    fn find_by_name_ignores_accents_and_case() {
        let idx = snapshot();
        assert_eq!(idx.find_by_name("ZURICH").map(|e| e.id), Some(3));
        // first of two folded-equal names wins
        assert_eq!(idx.find_by_name("san jose").map(|e| e.id), Some(4));
        assert!(idx.find_by_name("Zur").is_none());
    }

    #[test]
    fn substring_lookup_keeps_insertion_order() {
        let idx = snapshot();
        assert_eq!(
            names(&idx.find_cities_by_substring("jose")),
            vec!["San Jose", "San José", "South San Jose Hills"]
        );
        assert!(idx.find_cities_by_substring("").is_empty());
    }

    #[test]
    fn search_ranks_exact_before_partial_before_country() {
        let idx = snapshot();
        assert_eq!(
            names(&idx.search("San José")),
            vec!["San Jose", "San José", "South San Jose Hills"]
        );
        assert_eq!(names(&idx.search("ireland")), vec!["Dublin", "Cork"]);
        assert_eq!(names(&idx.search("pol")), vec!["Warsaw"]);
        assert!(idx.search("").is_empty());
        assert!(idx.search("atlantis").is_empty());
    }

    #[test]
    fn search_lists_a_city_once() {
        let idx = SpatialIndex::build(vec![(
            1,
            -22.9068,
            -43.1729,
            DefaultCity::named("Brasília", "Brasil"),
        )])
        .unwrap();
        // matches both name and country
        assert_eq!(names(&idx.search("bras")), vec!["Brasília"]);
    }
}
