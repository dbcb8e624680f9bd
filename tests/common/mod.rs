#![allow(dead_code)]

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use featuregraph::{Feature, FeatureKind, FeatureOutput, Result};

/// Adds one to every input column and counts how often it was computed.
/// Without inputs it produces a single column holding `seed`.
pub struct Counting {
    pub calls: Rc<Cell<usize>>,
    pub seed: f64,
    pub warmup: usize,
}

impl Counting {
    pub fn new() -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let kind = Self {
            calls: calls.clone(),
            seed: 1.0,
            warmup: 0,
        };
        (kind, calls)
    }

    pub fn with_warmup(warmup: usize) -> Self {
        Self {
            calls: Rc::new(Cell::new(0)),
            seed: 1.0,
            warmup,
        }
    }
}

impl FeatureKind for Counting {
    fn type_tag(&self) -> &str {
        "Counting"
    }

    fn num_columns(&self, input_columns: &[usize]) -> Result<usize> {
        Ok(input_columns.first().copied().unwrap_or(1))
    }

    fn compute_output(&self, inputs: &[FeatureOutput]) -> Result<Vec<f64>> {
        self.calls.set(self.calls.get() + 1);
        match inputs.first() {
            Some(input) => Ok(input.iter().map(|v| v + 1.0).collect()),
            None => Ok(vec![self.seed]),
        }
    }

    fn warmup_time(&self, inputs_warmup: usize) -> usize {
        inputs_warmup.max(self.warmup)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Counting node with an explicit id.
pub fn counting(id: &str, inputs: Vec<Feature>) -> (Feature, Rc<Cell<usize>>) {
    let (kind, calls) = Counting::new();
    let feature = Feature::with_id(id, kind, inputs).unwrap();
    (feature, calls)
}
