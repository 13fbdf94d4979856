//! Pruner checkpoint persistence.
//!
//! Only the mask and the configuration need to survive a restart; the
//! schedule is a pure function of the iteration number.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PruneError, Result};
use crate::prune::config::PrunerConfig;
use crate::prune::pruner::MaskUpdate;

/// Serializable pruner state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrunerCheckpoint {
    /// Shape of the masked weight.
    pub shape: Vec<usize>,
    /// Configuration the pruner was built with.
    pub config: PrunerConfig,
    /// Committed mask values.
    pub mask: Vec<f32>,
    /// Last mask update, if any.
    #[serde(default)]
    pub last_update: Option<MaskUpdate>,
}

impl PrunerCheckpoint {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PruneError::Parse(format!("JSON serialization error: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PruneError::Parse(format!("Failed to parse checkpoint: {e}")))
    }

    /// Write the checkpoint as pretty JSON, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                PruneError::io(format!("Failed to create directory {}", parent.display()), e)
            })?;
        }
        fs::write(path, self.to_json()?).map_err(|e| {
            PruneError::io(format!("Failed to write checkpoint {}", path.display()), e)
        })?;
        info!(path = %path.display(), elements = self.mask.len(), "saved pruner checkpoint");
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PruneError::io(format!("Failed to read checkpoint {}", path.display()), e)
        })?;
        Self::from_json(&content)
    }
}
