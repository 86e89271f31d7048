use thiserror::Error;

/// Everything that can abort a validation pass.
///
/// An ordinary validation failure is never an error: it shows up as
/// `valid() == false` plus the failed-rule list. These variants describe
/// defects in the rule tree, the data context or an external collaborator.
#[derive(Debug, Error)]
pub enum ValidationError {
    // A `{identifier}` token matched neither a direct key nor a dotted path.
    #[error("formatting error: unresolved template token `{{{identifier}}}`")]
    Formatting { identifier: String },

    // A `rules`/`alternatives` entry carries neither `validator` nor `interstitial`.
    #[error("structure error: `{owner}` has a malformed `{field}` entry at index {index}")]
    Structure {
        owner: String,
        field: &'static str,
        index: usize,
    },

    #[error("unknown validator `{0}`")]
    UnknownValidator(String),

    #[error("unknown interstitial `{0}`")]
    UnknownInterstitial(String),

    #[error("`{name}` expects {expected} arguments, got {got}")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },

    // A builtin received a value of the wrong JSON type.
    #[error("`{name}`: {message}")]
    Argument { name: String, message: String },

    #[error("invalid data context: {0}")]
    InvalidData(String),

    #[error("schema error: {0}")]
    Schema(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
