// crates/geoquery-core/src/filter.rs
use crate::index::LocatedEntity;
use crate::model::City;
use crate::text::contains_folded;
use crate::traits::{EntityFilter, GeoBackend};
use serde::{Deserialize, Serialize};

/// Attribute predicate over cities.
///
/// Every set field must match; an all-`None` filter accepts everything.
/// Text fields are folded substring matches (`"dub"` matches `"Dublin"`),
/// numeric bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityFilter {
    pub name: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub min_population: Option<u64>,
    pub max_population: Option<u64>,
    pub min_founded_year: Option<i32>,
    pub max_founded_year: Option<i32>,
    pub is_capital: Option<bool>,
}

impl CityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, q: impl Into<String>) -> Self {
        self.name = Some(q.into());
        self
    }

    pub fn country(mut self, q: impl Into<String>) -> Self {
        self.country = Some(q.into());
        self
    }

    pub fn region(mut self, q: impl Into<String>) -> Self {
        self.region = Some(q.into());
        self
    }

    pub fn population_between(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_population = min;
        self.max_population = max;
        self
    }

    pub fn founded_between(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_founded_year = min;
        self.max_founded_year = max;
        self
    }

    pub fn capitals(mut self, is_capital: bool) -> Self {
        self.is_capital = Some(is_capital);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches<B: GeoBackend>(&self, city: &City<B>) -> bool {
        if let Some(q) = &self.name {
            if !contains_folded(city.name(), q) {
                return false;
            }
        }
        if let Some(q) = &self.country {
            if !contains_folded(city.country(), q) {
                return false;
            }
        }
        if let Some(q) = &self.region {
            match city.region() {
                Some(r) if contains_folded(r, q) => {}
                _ => return false,
            }
        }
        if self.min_population.is_some_and(|min| city.population < min) {
            return false;
        }
        if self.max_population.is_some_and(|max| city.population > max) {
            return false;
        }
        if self.min_founded_year.is_some() || self.max_founded_year.is_some() {
            let Some(year) = city.founded_year else {
                return false;
            };
            if self.min_founded_year.is_some_and(|min| year < min)
                || self.max_founded_year.is_some_and(|max| year > max)
            {
                return false;
            }
        }
        if self.is_capital.is_some_and(|c| c != city.is_capital) {
            return false;
        }
        true
    }
}

impl<B: GeoBackend> EntityFilter<City<B>> for CityFilter {
    #[inline]
    fn accepts(&self, entity: &LocatedEntity<City<B>>) -> bool {
        self.matches(&entity.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DefaultCity;

    fn city(name: &str, country: &str, pop: u64, capital: bool, year: Option<i32>) -> DefaultCity {
        let mut c = DefaultCity::named(name, country);
        c.population = pop;
        c.is_capital = capital;
        c.founded_year = year;
        c
    }

    #[test]
    fn empty_filter_accepts_all() {
        let f = CityFilter::new();
        assert!(f.is_empty());
        assert!(f.matches(&city("Cork", "Ireland", 0, false, None)));
    }

    #[test]
    fn text_fields_fold() {
        let c = city("Zürich", "Switzerland", 400_000, false, None);
        assert!(CityFilter::new().name("zur").matches(&c));
        assert!(CityFilter::new().country("SWITZ").matches(&c));
        assert!(!CityFilter::new().name("bern").matches(&c));
        // no region at all never matches a region query
        assert!(!CityFilter::new().region("zh").matches(&c));
    }

    #[test]
    fn bounds_are_inclusive() {
        let c = city("Dublin", "Ireland", 1_400_000, true, Some(988));
        let f = CityFilter::new().population_between(Some(1_400_000), Some(1_400_000));
        assert!(f.matches(&c));
        let f = CityFilter::new().population_between(Some(1_400_001), None);
        assert!(!f.matches(&c));
        let f = CityFilter::new().founded_between(Some(988), Some(988));
        assert!(f.matches(&c));
        assert!(CityFilter::new().capitals(true).matches(&c));
        assert!(!CityFilter::new().capitals(false).matches(&c));
    }

    #[test]
    fn unknown_founding_year_fails_year_bounds() {
        let c = city("Atlantis", "Nowhere", 1, false, None);
        assert!(!CityFilter::new().founded_between(None, Some(3000)).matches(&c));
        assert!(CityFilter::new().population_between(None, Some(10)).matches(&c));
    }

    #[cfg(feature = "json")]
    #[test]
    fn deserializes_partial_query() {
        let f: CityFilter =
            serde_json::from_str(r#"{"country":"ireland","min_population":100000}"#).unwrap();
        assert_eq!(f.country.as_deref(), Some("ireland"));
        assert_eq!(f.min_population, Some(100_000));
        assert_eq!(f.max_population, None);
    }
}
