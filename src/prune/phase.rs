//! Train / inference phase flag.

use serde::{Deserialize, Serialize};

/// Execution phase supplied by the host on every call.
///
/// Mask updates only ever happen in [`Phase::Train`]; inference reuses the
/// last committed mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Train,
    Inference,
}

impl Phase {
    pub fn is_train(self) -> bool {
        matches!(self, Phase::Train)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Train => write!(f, "train"),
            Phase::Inference => write!(f, "inference"),
        }
    }
}
