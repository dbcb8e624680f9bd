use std::str::FromStr;

use crate::core::{Feature, FeatureMap};
use crate::error::{FeatureError, Result};

/// Cursor over a description record for use inside factories.
///
/// Positions 0 and 1 are the id and type tag; reading starts right after
/// them. Every token is trimmed before use.
pub struct DescriptionReader<'a> {
    tokens: &'a [String],
    features: &'a FeatureMap,
    position: usize,
}

impl<'a> DescriptionReader<'a> {
    pub fn new(tokens: &'a [String], features: &'a FeatureMap) -> Result<Self> {
        if tokens.len() < 2 {
            return Err(FeatureError::range(format!(
                "description needs at least an id and a type, got {} token(s)",
                tokens.len()
            )));
        }
        Ok(Self {
            tokens,
            features,
            position: 2,
        })
    }

    pub fn id(&self) -> &'a str {
        self.tokens[0].trim()
    }

    pub fn type_tag(&self) -> &'a str {
        self.tokens[1].trim()
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.position
    }

    fn next_token(&mut self, what: &str) -> Result<&'a str> {
        let token = self.tokens.get(self.position).ok_or_else(|| {
            FeatureError::range(format!(
                "{} '{}': missing {} at position {}",
                self.type_tag(),
                self.id(),
                what,
                self.position
            ))
        })?;
        self.position += 1;
        Ok(token.trim())
    }

    /// Resolves the next token as the id of an already-built node.
    pub fn input(&mut self) -> Result<Feature> {
        let input_id = self.next_token("input id")?;
        self.features.get(input_id).cloned().ok_or_else(|| {
            FeatureError::range(format!(
                "{} '{}': unknown input '{}'",
                self.type_tag(),
                self.id(),
                input_id
            ))
        })
    }

    /// Resolves every remaining token as an input id.
    pub fn remaining_inputs(&mut self) -> Result<Vec<Feature>> {
        let mut inputs = Vec::with_capacity(self.remaining());
        while self.remaining() > 0 {
            inputs.push(self.input()?);
        }
        Ok(inputs)
    }

    /// Parses the next token as a type-specific field.
    pub fn field<T: FromStr>(&mut self, name: &str) -> Result<T> {
        let token = self.next_token(name)?;
        token.parse().map_err(|_| {
            FeatureError::range(format!(
                "{} '{}': invalid {} '{}'",
                self.type_tag(),
                self.id(),
                name,
                token
            ))
        })
    }

    /// Fails if tokens are left over.
    pub fn finish(self) -> Result<()> {
        if self.remaining() > 0 {
            return Err(FeatureError::range(format!(
                "{} '{}': {} unexpected trailing token(s)",
                self.type_tag(),
                self.id(),
                self.remaining()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Input;

    fn tokens(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reads_inputs_and_fields_in_order() {
        let mut features = FeatureMap::new();
        let input = Feature::with_id("raw", Input::new(3), vec![]).unwrap();
        features.insert("raw".to_string(), input.clone());

        let record = tokens(&[" s1 ", " Select", "raw ", "1", "2"]);
        let mut reader = DescriptionReader::new(&record, &features).unwrap();

        assert_eq!(reader.id(), "s1");
        assert_eq!(reader.type_tag(), "Select");
        assert!(reader.input().unwrap().ptr_eq(&input));
        assert_eq!(reader.field::<usize>("start").unwrap(), 1);
        assert_eq!(reader.field::<usize>("len").unwrap(), 2);
        reader.finish().unwrap();
    }

    #[test]
    fn unknown_input_is_a_range_error() {
        let features = FeatureMap::new();
        let record = tokens(&["m", "Magnitude", "nowhere"]);
        let mut reader = DescriptionReader::new(&record, &features).unwrap();

        let err = reader.input().unwrap_err();
        assert!(matches!(err, FeatureError::Range(ref msg) if msg.contains("nowhere")));
    }

    #[test]
    fn missing_and_malformed_fields_are_range_errors() {
        let features = FeatureMap::new();
        let record = tokens(&["i", "Input", "abc"]);
        let mut reader = DescriptionReader::new(&record, &features).unwrap();
        assert!(matches!(
            reader.field::<usize>("dimension"),
            Err(FeatureError::Range(_))
        ));
        assert!(matches!(
            reader.field::<usize>("dimension"),
            Err(FeatureError::Range(_))
        ));
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let features = FeatureMap::new();
        let record = tokens(&["i", "Input", "3", "extra"]);
        let mut reader = DescriptionReader::new(&record, &features).unwrap();
        reader.field::<usize>("dimension").unwrap();
        assert!(reader.finish().is_err());
    }
}
