//! Run configuration.
//!
//! A run is configured in three layers: built-in defaults, an optional
//! TOML file, and command-line flags. Each layer only overrides what it
//! explicitly sets, so a config file with a single key leaves everything
//! else at its default.

use crate::models::{Properties, WriteStrategy};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Fully resolved configuration for one benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Number of sensors to seed, ids `"1"` through the count.
    pub num_sensors: u64,
    /// Records written per sensor.
    pub records_per_sensor: usize,
    /// Outgoing AFFECTS edges per sensor.
    pub out_degree: usize,
    /// Persistence strategy under test.
    pub strategy: WriteStrategy,
    /// RNG seed; `None` seeds from the operating system.
    pub seed: Option<u64>,
    /// Skip failed writes instead of aborting the run.
    pub continue_on_error: bool,
    /// Extra properties stamped onto every seeded sensor.
    pub extra_properties: Properties,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            num_sensors: 10,
            records_per_sensor: 1_000,
            out_degree: 3,
            strategy: WriteStrategy::default(),
            seed: None,
            continue_on_error: false,
            extra_properties: Properties::new(),
        }
    }
}

impl BenchConfig {
    /// Applies a config file on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        ConfigFile::load(path)?.apply(&mut config);
        Ok(config)
    }

    /// Rejects parameter combinations no run can satisfy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] describing the first violated
    /// constraint.
    pub fn validate(&self) -> Result<()> {
        if self.num_sensors == 0 {
            return Err(Error::InvalidArgument(
                "num_sensors must be at least 1".to_string(),
            ));
        }
        if self.records_per_sensor == 0 {
            return Err(Error::InvalidArgument(
                "records_per_sensor must be at least 1".to_string(),
            ));
        }
        let population = usize::try_from(self.num_sensors)
            .map_err(|_| Error::InvalidArgument("num_sensors is too large".to_string()))?;
        if self.out_degree >= population {
            return Err(Error::InvalidArgument(format!(
                "out_degree {} must be smaller than num_sensors {}",
                self.out_degree, self.num_sensors
            )));
        }
        Ok(())
    }
}

/// Partial configuration as read from a TOML file. Every field is
/// optional; absent keys keep the value from the layer below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    num_sensors: Option<u64>,
    records_per_sensor: Option<usize>,
    out_degree: Option<usize>,
    strategy: Option<WriteStrategy>,
    seed: Option<u64>,
    continue_on_error: Option<bool>,
    extra_properties: Option<Properties>,
}

impl ConfigFile {
    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on I/O or parse failure.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let file: Self = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("cannot parse {}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(file)
    }

    /// Overlays the set fields onto `config`.
    pub fn apply(self, config: &mut BenchConfig) {
        if let Some(v) = self.num_sensors {
            config.num_sensors = v;
        }
        if let Some(v) = self.records_per_sensor {
            config.records_per_sensor = v;
        }
        if let Some(v) = self.out_degree {
            config.out_degree = v;
        }
        if let Some(v) = self.strategy {
            config.strategy = v;
        }
        if let Some(v) = self.seed {
            config.seed = Some(v);
        }
        if let Some(v) = self.continue_on_error {
            config.continue_on_error = v;
        }
        if let Some(v) = self.extra_properties {
            config.extra_properties = v;
        }
    }
}
