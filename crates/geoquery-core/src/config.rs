// crates/geoquery-core/src/config.rs
use crate::error::{GeoError, Result};
use crate::index::MAX_RADIUS_KM;
use serde::{Deserialize, Serialize};

/// Defaults and limits applied by [`crate::engine::QueryEngine`].
///
/// Deserializable so a host can keep it next to its other settings; every
/// field is optional in the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// `k` used by nearest queries when the caller gives none.
    pub default_limit: usize,
    /// Radius used by radius queries when the caller gives none.
    pub default_radius_km: f64,
    /// Upper bound on radius queries. May be lowered, never raised past
    /// [`MAX_RADIUS_KM`].
    pub max_radius_km: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            default_radius_km: 100.0,
            max_radius_km: MAX_RADIUS_KM,
        }
    }
}

impl QueryConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.max_radius_km > 0.0 && self.max_radius_km <= MAX_RADIUS_KM) {
            return Err(GeoError::InvalidArgument(format!(
                "max_radius_km must be in (0, {MAX_RADIUS_KM}], got {}",
                self.max_radius_km
            )));
        }
        if !(self.default_radius_km > 0.0 && self.default_radius_km <= self.max_radius_km) {
            return Err(GeoError::InvalidArgument(format!(
                "default_radius_km must be in (0, {}], got {}",
                self.max_radius_km, self.default_radius_km
            )));
        }
        Ok(())
    }

    /// Parse a JSON settings document and validate it.
    #[cfg(feature = "json")]
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: QueryConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = QueryConfig::default();
        assert_eq!(c.default_limit, 10);
        assert_eq!(c.default_radius_km, 100.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn ceiling_cannot_be_raised() {
        let c = QueryConfig {
            max_radius_km: 25_000.0,
            ..QueryConfig::default()
        };
        assert!(matches!(c.validate(), Err(GeoError::InvalidArgument(_))));

        let c = QueryConfig {
            max_radius_km: 50.0,
            ..QueryConfig::default()
        };
        // default radius (100) now exceeds the ceiling
        assert!(c.validate().is_err());
    }

    #[cfg(feature = "json")]
    #[test]
    fn partial_json_fills_defaults() {
        let c = QueryConfig::from_json_str(r#"{"default_limit": 3}"#).unwrap();
        assert_eq!(c.default_limit, 3);
        assert_eq!(c.max_radius_km, MAX_RADIUS_KM);

        assert!(QueryConfig::from_json_str(r#"{"max_radius_km": -1}"#).is_err());
    }
}
