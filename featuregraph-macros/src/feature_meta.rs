use darling::FromAttributes;
use syn::DeriveInput;

/// Parsed attributes from #[feature_meta(...)]
#[derive(Debug, FromAttributes)]
#[darling(attributes(feature_meta))]
pub struct FeatureMetaArgs {
    /// Type tag written to and read from description records.
    /// Defaults to the struct name.
    #[darling(default)]
    pub tag: Option<String>,
}

pub fn parse_feature_info(input: &DeriveInput) -> darling::Result<FeatureMetaArgs> {
    FeatureMetaArgs::from_attributes(&input.attrs)
}

/// Tags end up in tab-separated records, so they must be a single
/// non-empty token.
pub fn validate_tag(tag: &str, ident: &syn::Ident) -> darling::Result<()> {
    if tag.is_empty() || tag.chars().any(char::is_whitespace) {
        return Err(darling::Error::custom(format!(
            "feature tag {tag:?} must be non-empty and contain no whitespace"
        ))
        .with_span(ident));
    }
    Ok(())
}
