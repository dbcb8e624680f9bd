pub mod snapshot;
pub mod traversal;

pub use snapshot::{snapshot, FeatureSnapshot, GraphSnapshot};
pub use traversal::{reaches, sinks, topological_order};
pub(crate) use traversal::warmup_times;
