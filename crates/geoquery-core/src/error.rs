// crates/geoquery-core/src/error.rs

//! Error type shared by the query core and the loader.

use thiserror::Error;

/// Errors produced by geoquery-core.
///
/// The first three variants are request-validation failures. They are
/// deterministic, raised before any index access and never retried. The
/// rest come from the loader (I/O, decoding).
#[derive(Debug, Error)]
pub enum GeoError {
    /// Latitude outside [-90, 90] or longitude outside [-180, 180].
    #[error("Invalid coordinates ({lat}, {lon}): lat must be -90 to 90, lon must be -180 to 180")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// Out-of-range scalar argument (e.g. radius).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Degenerate or inverted bounding box.
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl GeoError {
    /// True for the caller-input failures a transport maps to "400 Bad Request".
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            GeoError::InvalidCoordinate { .. }
                | GeoError::InvalidArgument(_)
                | GeoError::InvalidBoundingBox(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GeoError>;
