//! Read-only inputs of the conversion engine: user options, target features, family table.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::foundation::error::{FlowError, FlowResult};

/// Model-family tags and the classification table.
pub mod families;
/// Target-engine capability flags.
pub mod features;
/// Typed user option store.
pub mod params;

use families::ModelFamilies;
use features::FeatureSet;
use params::GenParams;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Everything the conversion engine reads besides the graph itself.
pub struct GenConfig {
    /// User options.
    #[serde(default)]
    pub params: GenParams,
    /// Target-engine features.
    #[serde(default)]
    pub features: FeatureSet,
    /// Family classification table.
    #[serde(default)]
    pub families: ModelFamilies,
}

impl GenConfig {
    /// Load a JSON configuration document from `path`.
    pub fn from_path(path: impl AsRef<Path>) -> FlowResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FlowError::config(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_reader(r: impl Read) -> FlowResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| FlowError::serde(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a JSON configuration string.
    pub fn from_json_str(s: &str) -> FlowResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Check option types and value ranges.
    pub fn validate(&self) -> FlowResult<()> {
        self.params.validate()?;
        for (param, min) in [
            (params::keys::VAE_TILE_SIZE, 1),
            (params::keys::VAE_TEMPORAL_TILE_SIZE, 1),
            (params::keys::BATCH_SIZE, 1),
            (params::keys::VIDEO_FPS, 1),
            (params::keys::VAE_TILE_OVERLAP, 0),
            (params::keys::VAE_TEMPORAL_TILE_OVERLAP, 0),
        ] {
            if let Some(v) = self.params.try_get(param)
                && v < min
            {
                return Err(FlowError::config(format!(
                    "option '{}' must be >= {min}, got {v}",
                    param.key()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/loader.rs"]
mod tests;
