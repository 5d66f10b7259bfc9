// crates/geoquery-core/src/engine.rs

//! # Query Engine
//!
//! The caller-facing layer: validates request scalars, runs the query on
//! the current [`SpatialIndex`] snapshot, and assembles response envelopes.
//!
//! **Snapshots:** the engine holds an `Arc` to an immutable index behind a
//! `RwLock`. A query clones the `Arc` and releases the lock immediately; a
//! reload builds the new index without holding the lock and then swaps the
//! pointer. In-flight queries finish on the snapshot they started with, and
//! nobody ever observes a half-built index.
//!
//! **Rounding:** sorting always uses full-precision distances. Values are
//! rounded to 2 decimals only when responses are built.

use crate::config::QueryConfig;
use crate::error::{GeoError, Result};
use crate::geo::{km_to_miles, BoundingBox, GeoPoint};
use crate::index::{EntityId, LocatedEntity, Neighbor, SpatialIndex};
use crate::traits::EntityFilter;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};

/// Round a distance for presentation (2 decimals).
#[inline]
pub fn round_distance(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One ranked entry of a nearest/radius response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntity<T> {
    /// 1-based position in the final ordering.
    pub rank: usize,
    pub entity: LocatedEntity<T>,
    pub distance_km: f64,
    pub distance_miles: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestResponse<T> {
    pub search_point: GeoPoint,
    pub total_found: usize,
    pub results: Vec<RankedEntity<T>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadiusResponse<T> {
    pub search_point: GeoPoint,
    pub radius_km: f64,
    pub total_found: usize,
    pub results: Vec<RankedEntity<T>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundingBoxResponse<T> {
    pub bbox: BoundingBox,
    pub total_found: usize,
    pub entities: Vec<LocatedEntity<T>>,
}

/// Proximity query service over a swappable snapshot.
pub struct QueryEngine<T> {
    snapshot: RwLock<Arc<SpatialIndex<T>>>,
    config: QueryConfig,
}

impl<T> Default for QueryEngine<T> {
    fn default() -> Self {
        Self::from_index(SpatialIndex::new())
    }
}

impl<T> QueryEngine<T> {
    /// Engine over an empty snapshot with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_index(index: SpatialIndex<T>) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(index)),
            config: QueryConfig::default(),
        }
    }

    /// Replace the configuration after validating it.
    pub fn with_config(mut self, config: QueryConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// The current snapshot. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<SpatialIndex<T>> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Rebuild the snapshot from `(id, lat, lon, payload)` rows.
    ///
    /// The new index is built before the write lock is taken. On error the
    /// previous snapshot stays in place. Returns the new entity count.
    pub fn load<I>(&self, rows: I) -> Result<usize>
    where
        I: IntoIterator<Item = (EntityId, f64, f64, T)>,
    {
        let index = SpatialIndex::build(rows)?;
        Ok(self.replace(index))
    }

    /// Swap in an already-built index. Returns its entity count.
    pub fn replace(&self, index: SpatialIndex<T>) -> usize {
        let count = index.len();
        let fresh = Arc::new(index);
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *guard = fresh;
        count
    }
}

impl<T: Clone> QueryEngine<T> {
    /// The `k` nearest accepted entities to `(lat, lon)`.
    ///
    /// `k` defaults to [`QueryConfig::default_limit`]; `k <= 0` yields an
    /// empty result rather than an error.
    pub fn find_nearest<F>(
        &self,
        lat: f64,
        lon: f64,
        k: Option<i64>,
        filter: &F,
    ) -> Result<NearestResponse<T>>
    where
        F: EntityFilter<T> + ?Sized,
    {
        let search_point = GeoPoint::new(lat, lon)?;
        let k = match k {
            Some(k) => usize::try_from(k).unwrap_or(0),
            None => self.config.default_limit,
        };

        let snapshot = self.snapshot();
        let results = rank(snapshot.nearest(search_point, k, filter));

        Ok(NearestResponse {
            search_point,
            total_found: results.len(),
            results,
        })
    }

    /// Every accepted entity within `radius_km` (default
    /// [`QueryConfig::default_radius_km`]) of `(lat, lon)`.
    pub fn find_within_radius<F>(
        &self,
        lat: f64,
        lon: f64,
        radius_km: Option<f64>,
        filter: &F,
    ) -> Result<RadiusResponse<T>>
    where
        F: EntityFilter<T> + ?Sized,
    {
        let search_point = GeoPoint::new(lat, lon)?;
        let radius_km = radius_km.unwrap_or(self.config.default_radius_km);
        if radius_km > self.config.max_radius_km {
            return Err(GeoError::InvalidArgument(format!(
                "radius_km must be at most {} km, got {radius_km}",
                self.config.max_radius_km
            )));
        }

        let snapshot = self.snapshot();
        let results = rank(snapshot.within_radius(search_point, radius_km, filter)?);

        Ok(RadiusResponse {
            search_point,
            radius_km,
            total_found: results.len(),
            results,
        })
    }

    /// Every accepted entity inside the box, in insertion order.
    pub fn find_within_bounding_box<F>(
        &self,
        min_lat: f64,
        min_lon: f64,
        max_lat: f64,
        max_lon: f64,
        filter: &F,
    ) -> Result<BoundingBoxResponse<T>>
    where
        F: EntityFilter<T> + ?Sized,
    {
        let bbox = BoundingBox::new(min_lat, min_lon, max_lat, max_lon)?;

        let snapshot = self.snapshot();
        let entities: Vec<LocatedEntity<T>> = snapshot
            .within_bounding_box(&bbox, filter)
            .into_iter()
            .cloned()
            .collect();

        Ok(BoundingBoxResponse {
            bbox,
            total_found: entities.len(),
            entities,
        })
    }
}

fn rank<T: Clone>(neighbors: Vec<Neighbor<'_, T>>) -> Vec<RankedEntity<T>> {
    neighbors
        .into_iter()
        .enumerate()
        .map(|(i, n)| RankedEntity {
            rank: i + 1,
            entity: n.entity.clone(),
            distance_km: round_distance(n.distance_km),
            distance_miles: round_distance(km_to_miles(n.distance_km)),
        })
        .collect()
}
