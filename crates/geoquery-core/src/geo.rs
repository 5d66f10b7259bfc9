// crates/geoquery-core/src/geo.rs

//! # Geodesy
//!
//! Value types ([`GeoPoint`], [`BoundingBox`]) and pure distance /
//! containment functions on a spherical Earth.
//!
//! Distances use the haversine formula on a sphere of mean radius
//! [`EARTH_RADIUS_KM`]. That is accurate to a few tenths of a percent,
//! which is plenty for city-scale proximity; it is not ellipsoid-exact.
//!
//! Bounding boxes are plain degree-space rectangles: no antimeridian
//! wraparound and no polar correction.

use crate::error::{GeoError, Result};
use serde::{Deserialize, Serialize};

/// Mean Earth radius (IUGG), in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;
/// Statute miles per kilometre.
pub const KM_TO_MILES: f64 = 0.621371;

const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// A validated (latitude, longitude) pair in degrees.
///
/// Serialized as `{"lat": .., "lng": ..}`. Deserialization goes through
/// [`GeoPoint::new`], so a cached snapshot can never smuggle in an
/// out-of-range point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoint")]
pub struct GeoPoint {
    lat: f64,
    #[serde(rename = "lng")]
    lon: f64,
}

#[derive(Deserialize)]
struct RawPoint {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawPoint> for GeoPoint {
    type Error = GeoError;

    fn try_from(raw: RawPoint) -> Result<Self> {
        GeoPoint::new(raw.lat, raw.lng)
    }
}

impl GeoPoint {
    /// Build a point, rejecting anything outside [-90, 90] x [-180, 180] (NaN included).
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if is_valid_lat(lat) && is_valid_lon(lon) {
            Ok(Self { lat, lon })
        } else {
            Err(GeoError::InvalidCoordinate { lat, lon })
        }
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to `other` in kilometres.
    #[inline]
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        distance_km(*self, *other)
    }
}

#[inline]
fn is_valid_lat(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}

#[inline]
fn is_valid_lon(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon)
}

/// An axis-aligned rectangle in latitude/longitude space.
///
/// Invariant: `min_lat < max_lat` and `min_lon < max_lon`, all corners
/// within valid coordinate ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
}

impl BoundingBox {
    /// Build a box from its corners.
    ///
    /// Corners outside the valid ranges fail with
    /// [`GeoError::InvalidCoordinate`]; an inverted or zero-width box fails
    /// with [`GeoError::InvalidBoundingBox`]. A box whose `min_lon` is east of
    /// `max_lon` (antimeridian crossing) is treated as inverted.
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Result<Self> {
        // Range check first so NaN never reaches the ordering checks.
        GeoPoint::new(min_lat, min_lon)?;
        GeoPoint::new(max_lat, max_lon)?;

        if min_lat >= max_lat {
            return Err(GeoError::InvalidBoundingBox(format!(
                "min_lat ({min_lat}) must be less than max_lat ({max_lat})"
            )));
        }
        if min_lon >= max_lon {
            return Err(GeoError::InvalidBoundingBox(format!(
                "min_lon ({min_lon}) must be less than max_lon ({max_lon})"
            )));
        }

        Ok(Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        })
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    /// Shorthand for [`contains_point`].
    #[inline]
    pub fn contains(&self, p: &GeoPoint) -> bool {
        contains_point(self, p)
    }
}

/// Great-circle distance between two points in kilometres (haversine).
///
/// `distance_km(a, a) == 0.0` and `distance_km(a, b) == distance_km(b, a)`
/// hold exactly; the arguments are put in a canonical order before any
/// floating-point work.
///
/// # Example
///
/// ```
/// use geoquery_core::geo::{distance_km, GeoPoint};
///
/// let dublin = GeoPoint::new(53.3498, -6.2603).unwrap();
/// let london = GeoPoint::new(51.5074, -0.1278).unwrap();
/// let d = distance_km(dublin, london);
/// assert!((d - 464.0).abs() < 2.0);
/// ```
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let (a, b) = if (b.lat, b.lon) < (a.lat, a.lon) { (b, a) } else { (a, b) };

    let lat1 = a.lat * DEG_TO_RAD;
    let lat2 = b.lat * DEG_TO_RAD;
    let delta_lat = (b.lat - a.lat) * DEG_TO_RAD;
    let delta_lon = (b.lon - a.lon) * DEG_TO_RAD;

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1.0 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Great-circle distance in statute miles.
#[inline]
pub fn distance_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    km_to_miles(distance_km(a, b))
}

#[inline]
pub fn km_to_miles(km: f64) -> f64 {
    km * KM_TO_MILES
}

/// Inclusive rectangular containment in degree space.
#[inline]
pub fn contains_point(bbox: &BoundingBox, p: &GeoPoint) -> bool {
    bbox.min_lat <= p.lat && p.lat <= bbox.max_lat && bbox.min_lon <= p.lon && p.lon <= bbox.max_lon
}

/// Widest latitude span (in degrees) a point within `radius_km` of a
/// reference can differ by. A great circle never covers fewer kilometres
/// than its latitude change, so this bound is exact up to rounding.
#[inline]
pub(crate) fn max_lat_delta_deg(radius_km: f64) -> f64 {
    (radius_km / EARTH_RADIUS_KM) / DEG_TO_RAD
}
