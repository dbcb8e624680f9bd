use std::any::Any;

use featuregraph_macros::RegisterFeature;

use super::single_input;
use crate::core::{Feature, FeatureKind, FeatureMap, FeatureOutput};
use crate::error::Result;
use crate::registry::{DescriptionReader, FromDescription, TypeTag};

/// Multiplies every column of its input by a constant factor.
///
/// Description suffix: `<factor>`.
#[derive(Debug, Clone, RegisterFeature)]
#[feature_meta(tag = "Scale")]
pub struct Scale {
    factor: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Scale {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl FeatureKind for Scale {
    fn type_tag(&self) -> &str {
        Self::TYPE_TAG
    }

    fn num_columns(&self, input_columns: &[usize]) -> Result<usize> {
        single_input(Self::TYPE_TAG, input_columns)
    }

    fn compute_output(&self, inputs: &[FeatureOutput]) -> Result<Vec<f64>> {
        Ok(inputs[0].iter().map(|sample| sample * self.factor).collect())
    }

    fn add_to_description(&self, description: &mut Vec<String>) {
        description.push(self.factor.to_string());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl FromDescription for Scale {
    fn from_description(description: &[String], features: &FeatureMap) -> Result<Feature> {
        let mut reader = DescriptionReader::new(description, features)?;
        let id = reader.id();
        let input = reader.input()?;
        let factor = reader.field("factor")?;
        reader.finish()?;
        Feature::with_id(id, Scale::new(factor), vec![input])
    }
}
