//! Incremental feature computation graph.
//!
//! Nodes ([`Feature`]) produce fixed-width numeric vectors from the outputs
//! of their inputs. Outputs are computed lazily and cached; [`Feature::reset`]
//! invalidates a node and everything downstream of it. Graphs round-trip
//! through tab-separated description records ([`codec`]) using a type-tag
//! [`registry`].

pub mod codec;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod graph;
pub mod registry;

pub use crate::core::{Feature, FeatureKind, FeatureMap, FeatureOutput, RawInput};
pub use error::{FeatureError, Result};
pub use registry::Registry;
