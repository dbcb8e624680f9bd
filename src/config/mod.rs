use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings for one `featuregraph` run, read from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// File of tab-separated description records.
    pub graph: PathBuf,

    /// Ids to evaluate. Empty means every node nothing else reads from.
    #[serde(default)]
    pub roots: Vec<String>,

    /// Samples for raw-input nodes, keyed by id.
    #[serde(default)]
    pub inputs: BTreeMap<String, Vec<f64>>,

    /// Print a JSON snapshot of the graph after evaluation.
    #[serde(default = "default_dump")]
    pub dump: bool,
}

fn default_dump() -> bool {
    true
}

impl RunConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .context(format!("Failed to read run config from {:?}", path))?;
        let mut config: RunConfig = serde_json::from_str(&json)
            .context(format!("Failed to parse run config {:?}", path))?;

        // Graph paths are relative to the config file.
        if config.graph.is_relative() {
            if let Some(dir) = path.parent() {
                config.graph = dir.join(&config.graph);
            }
        }
        Ok(config)
    }
}
