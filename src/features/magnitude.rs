use std::any::Any;

use featuregraph_macros::RegisterFeature;

use super::single_input;
use crate::core::{Feature, FeatureKind, FeatureMap, FeatureOutput};
use crate::error::Result;
use crate::registry::{DescriptionReader, FromDescription, TypeTag};

/// Euclidean norm of its input, as a single column.
#[derive(Debug, Clone, Default, RegisterFeature)]
#[feature_meta(tag = "Magnitude")]
pub struct Magnitude;

impl FeatureKind for Magnitude {
    fn type_tag(&self) -> &str {
        Self::TYPE_TAG
    }

    fn num_columns(&self, input_columns: &[usize]) -> Result<usize> {
        single_input(Self::TYPE_TAG, input_columns).map(|_| 1)
    }

    fn compute_output(&self, inputs: &[FeatureOutput]) -> Result<Vec<f64>> {
        let sum_of_squares: f64 = inputs[0].iter().map(|sample| sample * sample).sum();
        Ok(vec![sum_of_squares.sqrt()])
    }

    fn column_description(&self, _index: usize) -> String {
        "magnitude".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl FromDescription for Magnitude {
    fn from_description(description: &[String], features: &FeatureMap) -> Result<Feature> {
        let mut reader = DescriptionReader::new(description, features)?;
        let id = reader.id();
        let input = reader.input()?;
        reader.finish()?;
        Feature::with_id(id, Magnitude, vec![input])
    }
}
