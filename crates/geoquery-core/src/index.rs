// crates/geoquery-core/src/index.rs

//! # Spatial Index
//!
//! An immutable snapshot of located entities, answering three query shapes:
//! k-nearest, within-radius and within-bounding-box.
//!
//! **Layout:** entities live in one contiguous `Vec` in insertion order
//! (the tie-break order). A secondary array of positions sorted by latitude
//! lets radius and bbox queries binary-search the latitude band that can
//! possibly match instead of touching every entity. Nearest queries scan
//! everything. The band only prunes candidates: the exact predicate still
//! decides membership, so results match a brute-force scan exactly.

use crate::error::{GeoError, Result};
use crate::geo::{contains_point, distance_km, max_lat_delta_deg, BoundingBox, GeoPoint};
use crate::traits::EntityFilter;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Hard ceiling on radius queries (~half of Earth's circumference).
pub const MAX_RADIUS_KM: f64 = 20_000.0;

/// Slack added to the latitude band so floating error in the haversine
/// never pushes a boundary point out of the candidate set.
const BAND_EPSILON_DEG: f64 = 1e-9;

/// Largest snapshot the `u32` position arrays can address.
pub const MAX_ENTITIES: usize = u32::MAX as usize;

/// Opaque entity identifier, owned by the entity store.
pub type EntityId = u64;

/// An identifier, a validated location, and a caller-owned payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocatedEntity<T> {
    pub id: EntityId,
    pub location: GeoPoint,
    pub payload: T,
}

impl<T> LocatedEntity<T> {
    pub fn new(id: EntityId, location: GeoPoint, payload: T) -> Self {
        Self {
            id,
            location,
            payload,
        }
    }

    /// Validates `(lat, lon)` and wraps the payload.
    pub fn from_row(id: EntityId, lat: f64, lon: f64, payload: T) -> Result<Self> {
        Ok(Self::new(id, GeoPoint::new(lat, lon)?, payload))
    }
}

/// One hit of a distance-ordered query. `distance_km` is full precision.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'a, T> {
    pub entity: &'a LocatedEntity<T>,
    pub distance_km: f64,
}

/// Internal candidate: insertion position + full-precision distance.
#[derive(Clone, Copy)]
struct Candidate {
    pos: u32,
    distance_km: f64,
}

/// Total order over candidates: distance first, insertion order second.
/// Positions are unique, so any sort under this order is deterministic.
#[inline]
fn by_distance_then_position(a: &Candidate, b: &Candidate) -> Ordering {
    a.distance_km
        .total_cmp(&b.distance_km)
        .then_with(|| a.pos.cmp(&b.pos))
}

/// Immutable snapshot of located entities.
#[derive(Clone, Debug)]
pub struct SpatialIndex<T> {
    /// Master list, insertion order.
    entities: Vec<LocatedEntity<T>>,
    /// Positions into `entities`, sorted by (latitude, position).
    by_lat: Vec<u32>,
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            by_lat: Vec::new(),
        }
    }
}

impl<T> SpatialIndex<T> {
    /// Empty index; every query returns an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from already-validated entities, keeping their order.
    ///
    /// Fails with [`GeoError::InvalidData`] past [`MAX_ENTITIES`].
    pub fn from_entities(entities: Vec<LocatedEntity<T>>) -> Result<Self> {
        check_capacity(entities.len())?;
        // every position now fits in u32
        let mut by_lat: Vec<u32> = (0..entities.len() as u32).collect();
        by_lat.sort_by(|&a, &b| {
            entities[a as usize]
                .location
                .lat()
                .total_cmp(&entities[b as usize].location.lat())
                .then_with(|| a.cmp(&b))
        });

        tracing::debug!(entities = entities.len(), "spatial snapshot built");
        Ok(Self { entities, by_lat })
    }

    /// Build a snapshot from raw `(id, lat, lon, payload)` rows.
    ///
    /// Fails with [`GeoError::InvalidCoordinate`] on the first bad row; no
    /// partially built index is ever returned.
    pub fn build<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (EntityId, f64, f64, T)>,
    {
        let entities = rows
            .into_iter()
            .map(|(id, lat, lon, payload)| LocatedEntity::from_row(id, lat, lon, payload))
            .collect::<Result<Vec<_>>>()?;
        Self::from_entities(entities)
    }

    /// Replace the whole snapshot. On error `self` is left untouched.
    pub fn load<I>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = (EntityId, f64, f64, T)>,
    {
        *self = Self::build(rows)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All entities in insertion order.
    pub fn entities(&self) -> &[LocatedEntity<T>] {
        &self.entities
    }

    /// The `k` accepted entities closest to `point`.
    ///
    /// Ascending by distance; exact ties keep insertion order. `k == 0`
    /// yields an empty result, and a `k` beyond the eligible count returns
    /// every eligible entity.
    pub fn nearest<F>(&self, point: GeoPoint, k: usize, filter: &F) -> Vec<Neighbor<'_, T>>
    where
        F: EntityFilter<T> + ?Sized,
    {
        if k == 0 {
            return Vec::new();
        }

        let mut candidates: Vec<Candidate> = self
            .entities
            .iter()
            .enumerate()
            .filter(|(_, e)| filter.accepts(e))
            .map(|(pos, e)| Candidate {
                pos: pos as u32,
                distance_km: distance_km(point, e.location),
            })
            .collect();

        // Partial selection keeps this O(n + k log k); the comparator is a
        // total order, so the outcome equals a full stable sort.
        if k < candidates.len() {
            candidates.select_nth_unstable_by(k - 1, by_distance_then_position);
            candidates.truncate(k);
        }
        candidates.sort_unstable_by(by_distance_then_position);

        self.to_neighbors(candidates)
    }

    /// Every accepted entity within `radius_km` of `point` (inclusive).
    ///
    /// Ordered like [`SpatialIndex::nearest`]. A radius `<= 0`, above
    /// [`MAX_RADIUS_KM`] or NaN fails with [`GeoError::InvalidArgument`].
    pub fn within_radius<F>(
        &self,
        point: GeoPoint,
        radius_km: f64,
        filter: &F,
    ) -> Result<Vec<Neighbor<'_, T>>>
    where
        F: EntityFilter<T> + ?Sized,
    {
        validate_radius(radius_km)?;

        let delta = max_lat_delta_deg(radius_km) + BAND_EPSILON_DEG;
        let band = self.lat_band(point.lat() - delta, point.lat() + delta);

        let mut candidates: Vec<Candidate> = band
            .iter()
            .filter_map(|&pos| {
                let e = &self.entities[pos as usize];
                if !filter.accepts(e) {
                    return None;
                }
                let d = distance_km(point, e.location);
                (d <= radius_km).then_some(Candidate {
                    pos,
                    distance_km: d,
                })
            })
            .collect();

        candidates.sort_unstable_by(by_distance_then_position);
        Ok(self.to_neighbors(candidates))
    }

    /// Every accepted entity inside `bbox` (inclusive edges), in insertion order.
    pub fn within_bounding_box<F>(&self, bbox: &BoundingBox, filter: &F) -> Vec<&LocatedEntity<T>>
    where
        F: EntityFilter<T> + ?Sized,
    {
        let mut hits: Vec<u32> = self
            .lat_band(bbox.min_lat(), bbox.max_lat())
            .iter()
            .copied()
            .filter(|&pos| {
                let e = &self.entities[pos as usize];
                contains_point(bbox, &e.location) && filter.accepts(e)
            })
            .collect();

        // The band is latitude-ordered; restore insertion order.
        hits.sort_unstable();
        hits.into_iter()
            .map(|pos| &self.entities[pos as usize])
            .collect()
    }

    /// Slice of `by_lat` whose latitudes fall in `[lo, hi]`.
    fn lat_band(&self, lo: f64, hi: f64) -> &[u32] {
        let lat_of = |pos: &u32| self.entities[*pos as usize].location.lat();
        let start = self.by_lat.partition_point(|p| lat_of(p) < lo);
        let end = self.by_lat.partition_point(|p| lat_of(p) <= hi);
        &self.by_lat[start..end.max(start)]
    }

    fn to_neighbors(&self, candidates: Vec<Candidate>) -> Vec<Neighbor<'_, T>> {
        candidates
            .into_iter()
            .map(|c| Neighbor {
                entity: &self.entities[c.pos as usize],
                distance_km: c.distance_km,
            })
            .collect()
    }
}

/// Radius contract shared by the index and the engine.
pub(crate) fn validate_radius(radius_km: f64) -> Result<()> {
    if radius_km > 0.0 && radius_km <= MAX_RADIUS_KM {
        Ok(())
    } else {
        Err(GeoError::InvalidArgument(format!(
            "radius_km must be greater than 0 and at most {MAX_RADIUS_KM} km, got {radius_km}"
        )))
    }
}

fn check_capacity(len: usize) -> Result<()> {
    if len > MAX_ENTITIES {
        return Err(GeoError::InvalidData(format!(
            "snapshot of {len} entities exceeds the limit of {MAX_ENTITIES}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::AcceptAll;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn two_cities() -> SpatialIndex<&'static str> {
        SpatialIndex::build(vec![
            (1, 53.3498, -6.2603, "Dublin"),
            (2, 51.5074, -0.1278, "London"),
        ])
        .unwrap()
    }

    /// Deterministic pseudo-random coordinates (64-bit LCG).
    fn scatter(n: usize, seed: u64) -> Vec<(EntityId, f64, f64, usize)> {
        let mut state = seed;
        let mut next = move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        };
        (0..n)
            .map(|i| {
                let lat = next() * 180.0 - 90.0;
                let lon = next() * 360.0 - 180.0;
                (i as EntityId, lat, lon, i)
            })
            .collect()
    }

    #[test]
    fn build_rejects_bad_rows_and_load_keeps_old_snapshot() {
        let err = SpatialIndex::build(vec![(1, 10.0, 10.0, ()), (2, 91.0, 0.0, ())]).unwrap_err();
        assert!(matches!(err, GeoError::InvalidCoordinate { .. }));

        let mut index = two_cities();
        assert!(index.load(vec![(9, 0.0, 200.0, "Nowhere")]).is_err());
        assert_eq!(index.len(), 2);

        index.load(vec![(3, 48.8566, 2.3522, "Paris")]).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.entities()[0].payload, "Paris");
    }

    #[test]
    fn nearest_returns_self_first() {
        let index = two_cities();
        let hits = index.nearest(pt(53.3498, -6.2603), 1, &AcceptAll);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity.payload, "Dublin");
        assert!(hits[0].distance_km.abs() < 1e-9);
    }

    #[test]
    fn nearest_k_edges() {
        let index = two_cities();
        assert!(index.nearest(pt(0.0, 0.0), 0, &AcceptAll).is_empty());

        let all = index.nearest(pt(51.0, 0.0), 50, &AcceptAll);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].entity.payload, "London");
        assert_eq!(all[1].entity.payload, "Dublin");

        assert!(SpatialIndex::<()>::new()
            .nearest(pt(0.0, 0.0), 5, &AcceptAll)
            .is_empty());
    }

    #[test]
    fn nearest_ties_keep_insertion_order() {
        // Four points at the same distance from the origin.
        let index = SpatialIndex::build(vec![
            (10, 0.0, 1.0, "east"),
            (11, 1.0, 0.0, "north"),
            (12, 0.0, -1.0, "west"),
            (13, -1.0, 0.0, "south"),
            (14, 0.0, 1.0, "east again"),
        ])
        .unwrap();

        let hits = index.nearest(pt(0.0, 0.0), 5, &AcceptAll);
        let ids: Vec<_> = hits.iter().map(|h| h.entity.id).collect();
        // East/west share a distance exactly; so do north/south.
        let east_west = distance_km(pt(0.0, 0.0), pt(0.0, 1.0));
        let north_south = distance_km(pt(0.0, 0.0), pt(1.0, 0.0));
        if east_west < north_south {
            assert_eq!(ids, vec![10, 12, 14, 11, 13]);
        } else if north_south < east_west {
            assert_eq!(ids, vec![11, 13, 10, 12, 14]);
        } else {
            assert_eq!(ids, vec![10, 11, 12, 13, 14]);
        }

        // Partial selection must agree with the full ordering.
        let top2: Vec<_> = index
            .nearest(pt(0.0, 0.0), 2, &AcceptAll)
            .iter()
            .map(|h| h.entity.id)
            .collect();
        assert_eq!(top2, ids[..2].to_vec());
    }

    #[test]
    fn nearest_applies_filter() {
        let index = two_cities();
        let not_dublin = |e: &LocatedEntity<&'static str>| e.payload != "Dublin";
        let hits = index.nearest(pt(53.3498, -6.2603), 1, &not_dublin);
        assert_eq!(hits[0].entity.payload, "London");
    }

    #[test]
    fn nearest_is_sorted_and_sized() {
        let index = SpatialIndex::build(scatter(2_000, 7)).unwrap();
        for (i, (_, lat, lon, _)) in scatter(25, 99).into_iter().enumerate() {
            let k = [0, 1, 10, 1_999, 2_000, 5_000][i % 6];
            let even = |e: &LocatedEntity<usize>| e.payload % 2 == 0;
            let hits = index.nearest(pt(lat, lon), k, &even);
            assert_eq!(hits.len(), k.min(1_000));
            assert!(hits.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
            assert!(hits.iter().all(|h| h.entity.payload % 2 == 0));
        }
    }

    #[test]
    fn nearest_is_idempotent() {
        let index = SpatialIndex::build(scatter(500, 3)).unwrap();
        let q = pt(12.5, -45.0);
        let a: Vec<_> = index
            .nearest(q, 20, &AcceptAll)
            .iter()
            .map(|h| (h.entity.id, h.distance_km.to_bits()))
            .collect();
        let b: Vec<_> = index
            .nearest(q, 20, &AcceptAll)
            .iter()
            .map(|h| (h.entity.id, h.distance_km.to_bits()))
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn radius_partitions_exactly() {
        let rows = scatter(3_000, 42);
        let index = SpatialIndex::build(rows.clone()).unwrap();
        for (_, lat, lon, _) in scatter(20, 1234) {
            let center = pt(lat, lon);
            for r in [1.0, 500.0, 2_500.0, 19_999.0] {
                let hits = index.within_radius(center, r, &AcceptAll).unwrap();
                assert!(hits.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));

                let mut inside: Vec<EntityId> = hits.iter().map(|h| h.entity.id).collect();
                inside.sort_unstable();
                let expected: Vec<EntityId> = rows
                    .iter()
                    .filter(|(_, la, lo, _)| distance_km(center, pt(*la, *lo)) <= r)
                    .map(|(id, ..)| *id)
                    .collect();
                assert_eq!(inside, expected, "center=({lat},{lon}) r={r}");
            }
        }
    }

    #[test]
    fn radius_near_pole_spans_meridians() {
        let index = SpatialIndex::build(vec![
            (1, 89.9, 0.0, "a"),
            (2, 89.9, 180.0, "b"),
            (3, 80.0, 90.0, "c"),
        ])
        .unwrap();
        let hits = index.within_radius(pt(89.95, 45.0), 50.0, &AcceptAll).unwrap();
        let mut names: Vec<_> = hits.iter().map(|h| h.entity.payload).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn radius_validation() {
        let index = two_cities();
        let center = pt(0.0, 0.0);
        for bad in [0.0, -5.0, 20_000.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                index.within_radius(center, bad, &AcceptAll),
                Err(GeoError::InvalidArgument(_))
            ));
        }
        assert!(index.within_radius(center, MAX_RADIUS_KM, &AcceptAll).is_ok());
        // Zero matches is a success.
        assert!(index
            .within_radius(center, 10.0, &AcceptAll)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn bbox_keeps_insertion_order() {
        let index = SpatialIndex::build(vec![
            (1, 54.0, -6.0, "north"),
            (2, 50.0, -5.0, "south"),
            (3, 52.0, -5.5, "middle"),
            (4, 60.0, -5.5, "outside"),
        ])
        .unwrap();
        let bbox = BoundingBox::new(49.0, -7.0, 55.0, -4.0).unwrap();
        let hits: Vec<_> = index
            .within_bounding_box(&bbox, &AcceptAll)
            .iter()
            .map(|e| e.payload)
            .collect();
        assert_eq!(hits, vec!["north", "south", "middle"]);
    }

    #[test]
    fn bbox_matches_containment_exactly() {
        let rows = scatter(3_000, 5);
        let index = SpatialIndex::build(rows.clone()).unwrap();
        let boxes = [
            (-10.0, -20.0, 10.0, 20.0),
            (40.0, -180.0, 90.0, 180.0),
            (-90.0, 100.0, -30.0, 179.0),
        ];
        for (a, b, c, d) in boxes {
            let bbox = BoundingBox::new(a, b, c, d).unwrap();
            let got: Vec<EntityId> = index
                .within_bounding_box(&bbox, &AcceptAll)
                .iter()
                .map(|e| e.id)
                .collect();
            let expected: Vec<EntityId> = rows
                .iter()
                .filter(|(_, la, lo, _)| contains_point(&bbox, &pt(*la, *lo)))
                .map(|(id, ..)| *id)
                .collect();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn capacity_is_bounded_by_position_width() {
        assert!(check_capacity(0).is_ok());
        assert!(check_capacity(MAX_ENTITIES).is_ok());
        assert_eq!(u32::try_from(MAX_ENTITIES - 1).ok(), Some(u32::MAX - 1));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_snapshot_is_rejected() {
        assert!(matches!(
            check_capacity(MAX_ENTITIES + 1),
            Err(GeoError::InvalidData(_))
        ));
        assert!(matches!(
            check_capacity(usize::MAX),
            Err(GeoError::InvalidData(_))
        ));
    }

    #[test]
    fn from_entities_keeps_order_and_sorts_band() {
        let rows = two_cities().entities().to_vec();
        let idx = SpatialIndex::from_entities(rows).unwrap();
        assert_eq!(idx.entities()[0].payload, "Dublin");
        // London sits further south, so it leads the latitude band
        assert_eq!(idx.by_lat, vec![1, 0]);
    }
}
