use thiserror::Error;

/// Failure channel for operations with documented preconditions (conversion,
/// upgrade/downgrade, serialization, traversal limits). Validation findings
/// never surface here; they stay in accumulated error lists.
#[derive(Debug, Error)]
pub enum CardError {
    /// The value failed structural validation.
    #[error("invalid UEC: {}", .errors.join("; "))]
    Invalid { errors: Vec<String> },

    /// Conversion was asked to run on a card that is not valid v1.
    #[error("card must be a valid v1 UEC: {}", .errors.join("; "))]
    NotConvertible { errors: Vec<String> },

    /// Conversion was asked to run on a card declaring a different version.
    #[error("card must be schema version \"{expected}\" to convert; found \"{found}\"")]
    WrongVersion {
        expected: &'static str,
        found: String,
    },

    /// The card carries no readable `schema.version` to dispatch on.
    #[error("card must be an object with a schema header")]
    MissingSchema,

    #[error("unsupported source version: {0}")]
    UnsupportedSource(String),

    #[error("unsupported target version: {0}")]
    UnsupportedTarget(String),

    /// The document nests deeper than the traversal guard allows.
    #[error("document nesting exceeds the maximum traversal depth")]
    DepthExceeded,

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}
