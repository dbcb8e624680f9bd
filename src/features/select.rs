use std::any::Any;

use featuregraph_macros::RegisterFeature;

use super::single_input;
use crate::core::{Feature, FeatureKind, FeatureMap, FeatureOutput};
use crate::error::{FeatureError, Result};
use crate::registry::{DescriptionReader, FromDescription, TypeTag};

/// Columns `[start, start + len)` of its input.
///
/// Description suffix: `<start>\t<len>`.
#[derive(Debug, Clone, RegisterFeature)]
#[feature_meta(tag = "Select")]
pub struct Select {
    start: usize,
    len: usize,
}

impl Select {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl FeatureKind for Select {
    fn type_tag(&self) -> &str {
        Self::TYPE_TAG
    }

    fn num_columns(&self, input_columns: &[usize]) -> Result<usize> {
        let available = single_input(Self::TYPE_TAG, input_columns)?;
        match self.start.checked_add(self.len) {
            Some(end) if end <= available => Ok(self.len),
            _ => Err(FeatureError::range(format!(
                "{} of columns {}..{}+{} out of bounds for input of {} columns",
                Self::TYPE_TAG,
                self.start,
                self.start,
                self.len,
                available
            ))),
        }
    }

    fn compute_output(&self, inputs: &[FeatureOutput]) -> Result<Vec<f64>> {
        inputs[0].range(self.start, self.len).map(<[f64]>::to_vec)
    }

    fn column_description(&self, index: usize) -> String {
        format!("{}_{}", Self::TYPE_TAG, self.start + index)
    }

    fn add_to_description(&self, description: &mut Vec<String>) {
        description.push(self.start.to_string());
        description.push(self.len.to_string());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl FromDescription for Select {
    fn from_description(description: &[String], features: &FeatureMap) -> Result<Feature> {
        let mut reader = DescriptionReader::new(description, features)?;
        let id = reader.id();
        let input = reader.input()?;
        let start = reader.field("start")?;
        let len = reader.field("len")?;
        reader.finish()?;
        Feature::with_id(id, Select::new(start, len), vec![input])
    }
}
