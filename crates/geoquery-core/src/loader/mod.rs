// crates/geoquery-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the physical layer (files, gzip, bincode snapshots) and turns a
//! city dataset into a [`SpatialIndex`]. Every load is all-or-nothing: one
//! bad coordinate fails the whole file.
//!
//! Supported inputs:
//! - `*.json` / `*.json.gz`: array of [`CityRaw`] records (`json` feature)
//! - `*.bin`: bincode snapshot written by [`SpatialIndex::save_as`]

use crate::error::{GeoError, Result};
use crate::index::{LocatedEntity, SpatialIndex};
use crate::model::{DefaultBackend, DefaultCity};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use tracing::debug;
#[cfg(feature = "json")]
use tracing::{info, warn};

pub mod common_io;

use common_io::{open_stream, write_generic, CompressionMode};
#[cfg(feature = "json")]
use common_io::{get_cache_path, is_cache_fresh};

/// Extension of binary snapshot caches.
pub const CACHE_SUFFIX: &str = "bin";

static CITY_INDEX_CACHE: OnceCell<SpatialIndex<DefaultCity>> = OnceCell::new();

/// A city snapshot with the default backend.
pub type CityIndex = SpatialIndex<DefaultCity>;

impl SpatialIndex<DefaultCity> {
    pub fn default_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    pub fn default_dataset_filename() -> &'static str {
        "cities.json"
    }

    /// The bundled dataset, parsed once per process.
    pub fn load_default() -> Result<&'static Self> {
        CITY_INDEX_CACHE.get_or_try_init(|| {
            let path = Self::default_data_dir().join(Self::default_dataset_filename());
            Self::load_from_path(path)
        })
    }

    /// Load a JSON dataset or a binary snapshot, picked by file extension.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match extension(path) {
            Some("bin") => Self::load_snapshot(path),
            #[cfg(feature = "json")]
            Some("json") | Some("gz") => Self::load_json(path),
            _ => Err(GeoError::InvalidData(format!(
                "Unsupported dataset format: {}",
                path.display()
            ))),
        }
    }

    /// **Smart Load:** reuse `<source>.bin` when it is fresh, otherwise
    /// parse the source and refresh the cache (best-effort).
    #[cfg(feature = "json")]
    pub fn load_cached(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let cache_path = get_cache_path(path, CACHE_SUFFIX);

        if is_cache_fresh(path, &cache_path) {
            match Self::load_snapshot(&cache_path) {
                Ok(index) => return Ok(index),
                Err(e) => debug!(cache = %cache_path.display(), error = %e, "stale or unreadable cache, rebuilding"),
            }
        }

        let index = Self::load_json(path)?;
        if let Err(e) = index.save_as(&cache_path) {
            warn!(cache = %cache_path.display(), error = %e, "failed to write snapshot cache");
        }
        Ok(index)
    }

    /// Parse a JSON (optionally gzipped) array of city records.
    #[cfg(feature = "json")]
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        use crate::model::{build_city_rows, CityRaw};

        let path = path.as_ref();
        let reader = open_stream(path)?;
        let raw: Vec<CityRaw> = serde_json::from_reader(reader)?;
        let index = Self::build(build_city_rows::<DefaultBackend>(raw))?;

        info!(path = %path.display(), cities = index.len(), "loaded city dataset");
        Ok(index)
    }

    /// Read a bincode snapshot. Points are re-validated on decode.
    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = open_stream(path)?;
        let entities: Vec<LocatedEntity<DefaultCity>> = bincode::deserialize_from(reader)?;

        debug!(path = %path.display(), cities = entities.len(), "loaded snapshot cache");
        Self::from_entities(entities)
    }

    /// Write this snapshot as bincode (gzipped under `compact`).
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        write_generic(path.as_ref(), self.entities(), CompressionMode::preferred())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}
