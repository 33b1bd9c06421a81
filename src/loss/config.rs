use std::path::Path;

use log::info;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// How the batch Hessian is assembled.
///
/// - `Sequential`: one pass over all rows on the calling thread.
/// - `Parallel`: rows are split into ranges of at least
///   `min_rows_per_task` rows, each summed into a private
///   matrix on the rayon pool, then the partials are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HessianStrategy {
    #[default]
    Sequential,
    Parallel { min_rows_per_task: usize },
}

/// Settings for [`MultinomialLoss::hessian_with`](crate::loss::MultinomialLoss::hessian_with).
///
/// Stored as JSON, e.g.
///
/// ```json
/// { "strategy": { "kind": "parallel", "min_rows_per_task": 256 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HessianConfig {
    #[serde(default)]
    pub strategy: HessianStrategy,
}

impl HessianConfig {
    pub fn sequential() -> Self {
        HessianConfig { strategy: HessianStrategy::Sequential }
    }

    pub fn parallel(min_rows_per_task: usize) -> Self {
        HessianConfig { strategy: HessianStrategy::Parallel { min_rows_per_task } }
    }

    pub fn validate(&self) -> Result<()> {
        match self.strategy {
            HessianStrategy::Parallel { min_rows_per_task: 0 } => Err(Error::InvalidConfig(
                "min_rows_per_task must be at least 1".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Parses and validates a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<HessianConfig> {
        let config: HessianConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads and validates a config previously written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<HessianConfig> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: HessianConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        info!("loaded hessian config from {}: {:?}", path.display(), config.strategy);
        Ok(config)
    }
}
