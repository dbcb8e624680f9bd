use thiserror::Error;

/// Errors raised while building, wiring, evaluating or decoding a feature graph.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// A description record names a type tag nobody registered.
    #[error("unknown feature type '{type_tag}'")]
    Configuration { type_tag: String },

    /// Malformed record, unresolved input id, or out-of-bounds access.
    #[error("{0}")]
    Range(String),

    /// Adding `from` as an input of `to` would make `to` reachable from itself.
    #[error("adding '{from}' as an input of '{to}' would create a cycle")]
    Cycle { from: String, to: String },

    /// The process-wide registry was already initialized.
    #[error("feature registry is already installed")]
    AlreadyInstalled,

    /// First failing record of a multi-record stream.
    #[error("line {line} (feature '{id}'): {source}")]
    Decode {
        line: usize,
        id: String,
        #[source]
        source: Box<FeatureError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FeatureError {
    pub fn range(message: impl Into<String>) -> Self {
        FeatureError::Range(message.into())
    }

    /// The innermost error, looking through `Decode` wrappers.
    pub fn root_cause(&self) -> &FeatureError {
        match self {
            FeatureError::Decode { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, FeatureError>;
