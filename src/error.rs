use thiserror::Error;

use crate::metadata::CastError;
use crate::path::PathError;

/// Errors raised by the translator.
///
/// Every variant carries a stable code (see [`TranslateError::code`]) so that
/// callers can classify failures without matching on messages.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The document or record has no entity-type field
    #[error("NO_OBJECT_TYPE: missing '{0}'")]
    NoObjectType(String),

    /// The entity type is not a string or has no metadata
    #[error("INVALID_OBJECTTYPE: {0}")]
    InvalidObjectType(String),

    /// The field is not declared in metadata, or has the wrong shape
    #[error("INVALID_FIELD: {0}")]
    InvalidField(String),

    /// The field's type cannot be compared with the requested operator
    #[error("INVALID_COMPARISON: {0}")]
    InvalidComparison(String),

    /// A path cannot be rendered or followed
    #[error("TRANSLATION_ERROR: {0}")]
    Translation(String),

    /// An n-ary operator was given no values
    #[error("EMPTY_VALUE_LIST: {0}")]
    EmptyValueList(String),

    /// The construct exists in metadata but is not supported here
    #[error("UNSUPPORTED_FEATURE: {0}")]
    Unsupported(String),

    /// Path syntax error
    #[error("INVALID_FIELD: {0}")]
    Path(#[from] PathError),

    /// A value could not be converted. Only seen before phase wrapping.
    #[error("{0}")]
    Cast(#[from] CastError),

    /// Unexpected failure inside a named translation phase
    #[error("INVALID_OBJECT in {phase}: {source}")]
    InvalidObject {
        phase: &'static str,
        #[source]
        source: CastError,
    },
}

impl TranslateError {
    /// The stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            TranslateError::NoObjectType(_) => "NO_OBJECT_TYPE",
            TranslateError::InvalidObjectType(_) => "INVALID_OBJECTTYPE",
            TranslateError::InvalidField(_) | TranslateError::Path(_) => "INVALID_FIELD",
            TranslateError::InvalidComparison(_) => "INVALID_COMPARISON",
            TranslateError::Translation(_) => "TRANSLATION_ERROR",
            TranslateError::EmptyValueList(_) => "EMPTY_VALUE_LIST",
            TranslateError::Unsupported(_) => "UNSUPPORTED_FEATURE",
            TranslateError::Cast(_) | TranslateError::InvalidObject { .. } => "INVALID_OBJECT",
        }
    }

    /// Rewraps internal failures into `INVALID_OBJECT` for `phase`.
    ///
    /// Structural errors pass through unchanged.
    pub(crate) fn in_phase(self, phase: &'static str) -> Self {
        match self {
            TranslateError::Cast(source) => {
                tracing::error!(phase, error = %source, "internal translation failure");
                TranslateError::InvalidObject { phase, source }
            }
            other => other,
        }
    }
}

pub type Result<T, E = TranslateError> = std::result::Result<T, E>;
