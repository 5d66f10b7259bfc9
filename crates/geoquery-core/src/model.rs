// crates/geoquery-core/src/model.rs
use crate::index::{EntityId, LocatedEntity};
use crate::traits::{GeoBackend, NameMatch};
use serde::{Deserialize, Serialize};

/// Default backend: plain `String` + `f64`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DefaultBackend;

impl GeoBackend for DefaultBackend {
    type Str = String;
    type Float = f64;

    #[inline]
    fn str_from(s: &str) -> Self::Str {
        s.to_owned()
    }

    #[inline]
    fn float_from(f: f64) -> Self::Float {
        f
    }

    fn float_to_f64(v: Self::Float) -> f64 {
        v
    }
}

/// Raw city record as it comes from a JSON dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct CityRaw {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
    #[serde(default)]
    pub is_capital: Option<bool>,
    #[serde(default)]
    pub founded_year: Option<i32>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub area_km2: Option<f64>,
}

/// City payload stored next to each location in the index.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct City<B: GeoBackend> {
    pub name: B::Str,
    pub country: B::Str,
    pub region: Option<B::Str>,
    pub population: u64,
    pub is_capital: bool,
    pub founded_year: Option<i32>,
    pub timezone: Option<B::Str>,
    pub description: Option<B::Str>,
    pub area_km2: Option<B::Float>,
}

impl<B: GeoBackend> City<B> {
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    pub fn country(&self) -> &str {
        self.country.as_ref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_ref().map(|r| r.as_ref())
    }

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_ref().map(|t| t.as_ref())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_ref().map(|d| d.as_ref())
    }

    pub fn area_km2(&self) -> Option<f64> {
        self.area_km2.map(B::float_to_f64)
    }

    /// Size class by population.
    ///
    /// ```rust
    /// use geoquery_core::DefaultCity;
    ///
    /// let mut city = DefaultCity::named("Dublin", "Ireland");
    /// city.population = 1_400_000;
    /// assert_eq!(city.population_category(), "Major City");
    /// ```
    pub fn population_category(&self) -> &'static str {
        match self.population {
            p if p >= 5_000_000 => "Megacity",
            p if p >= 1_000_000 => "Major City",
            p if p >= 500_000 => "Large City",
            _ => "City",
        }
    }

    /// `"Name, Country"`, as used in statistics output.
    pub fn label(&self) -> String {
        format!("{}, {}", self.name(), self.country())
    }

    /// Minimal city with only name and country set.
    pub fn named(name: &str, country: &str) -> Self {
        Self {
            name: B::str_from(name),
            country: B::str_from(country),
            region: None,
            population: 0,
            is_capital: false,
            founded_year: None,
            timezone: None,
            description: None,
            area_km2: None,
        }
    }

    fn from_raw(raw: CityRaw) -> Self {
        let opt_str = |s: Option<String>| s.as_deref().map(B::str_from);
        Self {
            name: B::str_from(&raw.name),
            country: B::str_from(&raw.country),
            region: opt_str(raw.region),
            population: raw.population.unwrap_or(0),
            is_capital: raw.is_capital.unwrap_or(false),
            founded_year: raw.founded_year,
            timezone: opt_str(raw.timezone),
            description: opt_str(raw.description),
            area_km2: raw.area_km2.map(B::float_from),
        }
    }
}

impl<B: GeoBackend> NameMatch for City<B> {
    fn name_str(&self) -> &str {
        self.name()
    }
}

/// Convert raw records into `(id, lat, lon, city)` ingest rows.
///
/// A record without an `id` gets its 1-based position in `raw`.
/// Coordinates are passed through unchecked; the index validates them.
pub fn build_city_rows<B: GeoBackend>(raw: Vec<CityRaw>) -> Vec<(EntityId, f64, f64, City<B>)> {
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| {
            let id = r.id.unwrap_or(i as u64 + 1);
            let (lat, lon) = (r.latitude, r.longitude);
            (id, lat, lon, City::from_raw(r))
        })
        .collect()
}

/// City with the default backend.
pub type DefaultCity = City<DefaultBackend>;
/// A located city as stored in the index.
pub type CityEntity<B = DefaultBackend> = LocatedEntity<City<B>>;
