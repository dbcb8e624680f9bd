use serde::{Deserialize, Serialize};

use super::traversal::{topological_order, warmup_times};
use crate::core::Feature;

/// Human-readable state of one node. Taking it never triggers a recompute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureSnapshot {
    pub id: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    pub inputs: Vec<String>,
    pub columns: Vec<String>,
    pub warmup: usize,
    pub dirty: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub output: Option<Vec<f64>>,
}

/// Every node reachable from a set of roots, inputs first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphSnapshot {
    pub features: Vec<FeatureSnapshot>,
}

impl GraphSnapshot {
    pub fn get(&self, id: &str) -> Option<&FeatureSnapshot> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn snapshot(roots: &[Feature]) -> GraphSnapshot {
    let warmups = warmup_times(roots);
    let features = topological_order(roots)
        .into_iter()
        .map(|feature| FeatureSnapshot {
            id: feature.id().to_string(),
            type_tag: feature.type_tag().to_string(),
            inputs: feature
                .inputs()
                .iter()
                .map(|input| input.id().to_string())
                .collect(),
            columns: feature.column_descriptions(),
            warmup: warmups.get(&feature.addr()).copied().unwrap_or(0),
            dirty: feature.is_dirty(),
            output: feature.cached_output().map(|output| output.to_vec()),
        })
        .collect();

    GraphSnapshot { features }
}
