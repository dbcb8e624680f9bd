use std::ops::Deref;
use std::rc::Rc;

use serde::{Serialize, Serializer};

use crate::error::{FeatureError, Result};

/// Output vector of a feature node.
///
/// Immutable once produced; clones share the same allocation, so handing a
/// cached output to several dependents never copies the samples.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureOutput(Rc<[f64]>);

impl FeatureOutput {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value of a single column.
    pub fn column(&self, index: usize) -> Result<f64> {
        self.0.get(index).copied().ok_or_else(|| {
            FeatureError::range(format!(
                "column {index} out of bounds for output of {} columns",
                self.0.len()
            ))
        })
    }

    /// Columns `[start, start + len)`.
    pub fn range(&self, start: usize, len: usize) -> Result<&[f64]> {
        start
            .checked_add(len)
            .and_then(|end| self.0.get(start..end))
            .ok_or_else(|| {
                FeatureError::range(format!(
                    "columns {start}..{start}+{len} out of bounds for output of {} columns",
                    self.0.len()
                ))
            })
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

impl Deref for FeatureOutput {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for FeatureOutput {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl Serialize for FeatureOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.as_slice().serialize(serializer)
    }
}
