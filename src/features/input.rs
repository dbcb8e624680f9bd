use std::any::Any;
use std::cell::RefCell;

use featuregraph_macros::RegisterFeature;

use crate::core::{Feature, FeatureKind, FeatureMap, FeatureOutput, RawInput};
use crate::error::{FeatureError, Result};
use crate::registry::{DescriptionReader, FromDescription, TypeTag};

/// Leaf holding the latest sample pushed in from outside the graph.
///
/// Description suffix: `<dimension>`. The sample itself is not persisted.
#[derive(Debug, RegisterFeature)]
#[feature_meta(tag = "Input")]
pub struct Input {
    dimension: usize,
    sample: RefCell<Vec<f64>>,
}

impl Input {
    /// An input of `dimension` columns, initially all zero.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            sample: RefCell::new(vec![0.0; dimension]),
        }
    }

    /// Like [`Input::new`], but reports a dimension that cannot be allocated
    /// as a Range error instead of aborting.
    pub fn try_new(dimension: usize) -> Result<Self> {
        let mut sample = Vec::new();
        sample.try_reserve_exact(dimension).map_err(|err| {
            FeatureError::range(format!(
                "{} dimension {dimension} cannot be allocated: {err}",
                Self::TYPE_TAG
            ))
        })?;
        sample.resize(dimension, 0.0);
        Ok(Self {
            dimension,
            sample: RefCell::new(sample),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl FeatureKind for Input {
    fn type_tag(&self) -> &str {
        Self::TYPE_TAG
    }

    fn num_columns(&self, input_columns: &[usize]) -> Result<usize> {
        if !input_columns.is_empty() {
            return Err(FeatureError::range(format!(
                "{} takes no inputs, got {}",
                Self::TYPE_TAG,
                input_columns.len()
            )));
        }
        Ok(self.dimension)
    }

    fn compute_output(&self, _inputs: &[FeatureOutput]) -> Result<Vec<f64>> {
        Ok(self.sample.borrow().clone())
    }

    fn add_to_description(&self, description: &mut Vec<String>) {
        description.push(self.dimension.to_string());
    }

    fn as_raw_input(&self) -> Option<&dyn RawInput> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RawInput for Input {
    fn set_sample(&self, values: Vec<f64>) {
        *self.sample.borrow_mut() = values;
    }

    fn sample(&self) -> Vec<f64> {
        self.sample.borrow().clone()
    }
}

impl FromDescription for Input {
    fn from_description(description: &[String], features: &FeatureMap) -> Result<Feature> {
        let mut reader = DescriptionReader::new(description, features)?;
        let id = reader.id();
        let dimension = reader.field("dimension")?;
        reader.finish()?;
        Feature::with_id(id, Input::try_new(dimension)?, vec![])
    }
}
