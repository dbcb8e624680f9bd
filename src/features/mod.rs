//! Built-in feature kinds.
//!
//! Each kind registers itself with `#[derive(RegisterFeature)]`; see
//! [`crate::registry::Registry::with_builtins`].

pub mod concat;
pub mod input;
pub mod magnitude;
pub mod scale;
pub mod select;

pub use concat::Concat;
pub use input::Input;
pub use magnitude::Magnitude;
pub use scale::Scale;
pub use select::Select;

use crate::error::{FeatureError, Result};

/// Checks a single-input kind and returns the width of that input.
fn single_input(type_tag: &str, input_columns: &[usize]) -> Result<usize> {
    match input_columns {
        [columns] => Ok(*columns),
        _ => Err(FeatureError::range(format!(
            "{type_tag} takes exactly one input, got {}",
            input_columns.len()
        ))),
    }
}
