use std::any::Any;

use featuregraph_macros::RegisterFeature;

use crate::core::{Feature, FeatureKind, FeatureMap, FeatureOutput};
use crate::error::{FeatureError, Result};
use crate::registry::{DescriptionReader, FromDescription, TypeTag};

/// Concatenates the outputs of its inputs, in input order.
///
/// No description suffix: every token after the type tag is an input id.
#[derive(Debug, Clone, Default, RegisterFeature)]
#[feature_meta(tag = "Concat")]
pub struct Concat;

impl FeatureKind for Concat {
    fn type_tag(&self) -> &str {
        Self::TYPE_TAG
    }

    fn num_columns(&self, input_columns: &[usize]) -> Result<usize> {
        if input_columns.is_empty() {
            return Err(FeatureError::range(format!(
                "{} needs at least one input",
                Self::TYPE_TAG
            )));
        }
        Ok(input_columns.iter().sum())
    }

    fn compute_output(&self, inputs: &[FeatureOutput]) -> Result<Vec<f64>> {
        Ok(inputs
            .iter()
            .flat_map(|output| output.iter().copied())
            .collect())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl FromDescription for Concat {
    fn from_description(description: &[String], features: &FeatureMap) -> Result<Feature> {
        let mut reader = DescriptionReader::new(description, features)?;
        let id = reader.id();
        let inputs = reader.remaining_inputs()?;
        Feature::with_id(id, Concat, inputs)
    }
}
