use reform_core::ParseKeyChordError;
use thiserror::Error;

use crate::FieldKey;

/// Configuration mistakes caught while building a form. A running form never
/// fails; invalid input is reported through validation errors instead.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("field `{0}` is declared more than once")]
    DuplicateField(FieldKey),
    #[error("invalid submit keybinding `{binding}`: {source}")]
    InvalidKeybinding {
        binding: String,
        #[source]
        source: ParseKeyChordError,
    },
    #[cfg(feature = "serde")]
    #[error("invalid form config: {0}")]
    Config(#[from] serde_json::Error),
}
