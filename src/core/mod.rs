pub mod feature;
pub mod output;

use std::collections::HashMap;

pub use feature::{Feature, FeatureKind, RawInput};
pub use output::FeatureOutput;

/// Id -> node map built up while decoding a graph.
pub type FeatureMap = HashMap<String, Feature>;
