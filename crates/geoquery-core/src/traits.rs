// crates/geoquery-core/src/traits.rs
use crate::index::LocatedEntity;
use crate::text::{contains_folded, equals_folded};
use serde::{Deserialize, Serialize};

/// Storage backend for strings and floats used by the city payload.
///
/// This abstraction allows the crate to swap how textual and floating-point
/// data are stored internally (for example to use more compact types) without
/// changing the public API of accessors that return `&str`/`f64` views.
///
/// Implementors must be `Clone + Send + Sync + 'static` and ensure the
/// associated types can be serialized/deserialized so snapshots can be cached
/// via bincode.
pub trait GeoBackend: Clone + Send + Sync + 'static {
    type Str: Clone
        + Send
        + Sync
        + std::fmt::Debug
        + Serialize
        + for<'de> Deserialize<'de>
        + AsRef<str>;
    type Float: Copy + Send + Sync + std::fmt::Debug + Serialize + for<'de> Deserialize<'de>;

    /// Convert an `&str` into the backend string representation.
    fn str_from(s: &str) -> Self::Str;
    /// Convert an `f64` into the backend float representation.
    fn float_from(f: f64) -> Self::Float;

    /// Convert backend float to plain `f64`.
    fn float_to_f64(v: Self::Float) -> f64;
}

/// Name-based matching helpers for types that expose a canonical display name.
///
/// Comparisons are accent-insensitive and case-insensitive, based on
/// [`crate::text::fold_key`].
///
/// # Examples
/// ```rust
/// use geoquery_core::traits::NameMatch;
///
/// struct Place(&'static str);
/// impl NameMatch for Place {
///     fn name_str(&self) -> &str { self.0 }
/// }
///
/// assert!(Place("Łódź").is_named("lodz"));
/// assert!(Place("Zürich").name_contains("zuri"));
/// ```
pub trait NameMatch {
    /// Returns the canonical display name used for matching.
    fn name_str(&self) -> &str;

    #[inline]
    fn is_named(&self, q: &str) -> bool {
        equals_folded(self.name_str(), q)
    }

    #[inline]
    fn name_contains(&self, q: &str) -> bool {
        contains_folded(self.name_str(), q)
    }
}

/// Caller-supplied predicate over indexed entities.
///
/// The index never looks inside a payload on its own; anything beyond
/// location (population thresholds, country names, ...) arrives through
/// this trait. Closures taking `&LocatedEntity<T>` implement it, as does
/// [`AcceptAll`].
pub trait EntityFilter<T> {
    fn accepts(&self, entity: &LocatedEntity<T>) -> bool;
}

impl<T, F> EntityFilter<T> for F
where
    F: Fn(&LocatedEntity<T>) -> bool,
{
    #[inline]
    fn accepts(&self, entity: &LocatedEntity<T>) -> bool {
        self(entity)
    }
}

/// The default filter: every entity is eligible.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl<T> EntityFilter<T> for AcceptAll {
    #[inline]
    fn accepts(&self, _entity: &LocatedEntity<T>) -> bool {
        true
    }
}
