//! The four time-series write strategies.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a single time-series observation is persisted.
///
/// The strategies are mutually exclusive encodings of the same logical fact
/// `(sensorid, timestamp, value)`:
///
/// | Variant | Storage shape |
/// |---------|---------------|
/// | `Index` | Standalone record behind a (sensorid, timestamp) unique index |
/// | `Graph` | Record embedded under the sensor's Year→Month→Day hierarchy |
/// | `Reference` | Sensor references its single most recent record |
/// | `Embed` | Timestamp-keyed entry in the sensor's map attribute |
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum WriteStrategy {
    /// Standalone record; retrieval relies on a secondary index.
    #[default]
    Index,
    /// Record embedded under a lazily materialized date hierarchy.
    Graph,
    /// Sensor keeps a reference to the most recent record only.
    Reference,
    /// Keyed partial update of the sensor's map-valued attribute.
    Embed,
}

impl WriteStrategy {
    /// Returns all strategy variants.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Index, Self::Graph, Self::Reference, Self::Embed]
    }

    /// Returns the strategy's canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Graph => "graph",
            Self::Reference => "reference",
            Self::Embed => "embed",
        }
    }

    /// Parses a strategy name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "index" => Some(Self::Index),
            "graph" => Some(Self::Graph),
            "reference" => Some(Self::Reference),
            "embed" => Some(Self::Embed),
            _ => None,
        }
    }
}

impl fmt::Display for WriteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_all_variants() {
        for strategy in WriteStrategy::all() {
            assert_eq!(WriteStrategy::parse(strategy.as_str()), Some(strategy));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(WriteStrategy::parse("GRAPH"), Some(WriteStrategy::Graph));
        assert_eq!(WriteStrategy::parse("Embed"), Some(WriteStrategy::Embed));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(WriteStrategy::parse("column"), None);
        assert_eq!(WriteStrategy::parse(""), None);
    }

    #[test]
    fn test_default_is_index() {
        assert_eq!(WriteStrategy::default(), WriteStrategy::Index);
    }
}
