//! Main pruner configuration struct.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PruneError, Result};
use crate::prune::mask::{MaskFiller, RankKey};
use crate::prune::schedule::PruningSchedule;

/// Configuration for a masked weight pruner.
///
/// # Example
///
/// ```
/// use podar::prune::{MaskFiller, PrunerConfig, PruningSchedule, RankKey};
///
/// let config = PrunerConfig::new()
///     .with_schedule(PruningSchedule::new(0.5, 1000, 100).unwrap())
///     .with_filler(MaskFiller::Constant { value: 1.0 })
///     .with_rank_key(RankKey::Mask);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrunerConfig {
    /// Sparsity schedule.
    schedule: PruningSchedule,

    /// Initial mask fill.
    #[serde(default)]
    filler: MaskFiller,

    /// Ranking key for mask updates.
    #[serde(default)]
    rank_key: RankKey,
}

impl PrunerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sparsity schedule.
    pub fn with_schedule(mut self, schedule: PruningSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Set the initial mask filler.
    pub fn with_filler(mut self, filler: MaskFiller) -> Self {
        self.filler = filler;
        self
    }

    /// Set the ranking key used by mask updates.
    pub fn with_rank_key(mut self, rank_key: RankKey) -> Self {
        self.rank_key = rank_key;
        self
    }

    pub fn schedule(&self) -> &PruningSchedule {
        &self.schedule
    }

    pub fn filler(&self) -> &MaskFiller {
        &self.filler
    }

    pub fn rank_key(&self) -> RankKey {
        self.rank_key
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.schedule.validate()?;
        self.filler.validate()
    }

    /// Parse and validate a YAML configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| PruneError::Parse(format!("Failed to parse YAML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PruneError::Parse(format!("Failed to parse JSON config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file: JSON for a `.json` extension, YAML otherwise.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PruneError::io(format!("Failed to read config file {}", path.display()), e)
        })?;

        let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Render as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| PruneError::Parse(format!("YAML serialization error: {e}")))
    }
}
