use crate::value::ValueView;
use std::fmt;

/// Failure while rendering a value.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// The output sink rejected a write
    #[error("failed to write to output: {0}")]
    Format(#[from] fmt::Error),
    /// A writer compiled for one shape was handed a value of another
    #[error("write function for a {expected} value received a {found} value")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl SerializeError {
    pub(crate) fn shape_mismatch(expected: &'static str, found: &ValueView<'_>) -> Self {
        SerializeError::ShapeMismatch {
            expected,
            found: found.kind_name(),
        }
    }
}
