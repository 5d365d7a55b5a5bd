//! Error types for identifier generation and parsing.

use arkiv_codec::DecodeError;
use thiserror::Error;

/// Errors that can occur when generating or parsing identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input text is empty.
    #[error("identifier text cannot be empty")]
    Empty,

    /// A generation parameter is outside its valid bit-width range.
    #[error("invalid {field}: {value} (maximum {max})")]
    InvalidArgument {
        field: &'static str,
        value: u64,
        max: u64,
    },

    /// The text length matches no known identifier encoding.
    #[error("unrecognized identifier format: length {length}")]
    UnknownFormat { length: usize },

    /// The raw byte payload has the wrong size.
    #[error("invalid identifier size: expected {expected} bytes, got {actual}")]
    InvalidByteLength { expected: usize, actual: usize },

    /// The Ark form is structurally broken.
    #[error("malformed ark identifier: {reason}")]
    MalformedArk { reason: String },

    /// The Base-N payload failed to decode.
    #[error("identifier payload failed to decode: {0}")]
    Decode(#[from] DecodeError),
}

impl IdError {
    /// Returns true if this error rejects an out-of-range generation
    /// parameter.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, IdError::InvalidArgument { .. })
    }

    /// Returns true if this error rejects malformed identifier text or
    /// bytes.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            IdError::Empty
                | IdError::UnknownFormat { .. }
                | IdError::InvalidByteLength { .. }
                | IdError::MalformedArk { .. }
                | IdError::Decode(_)
        )
    }
}
