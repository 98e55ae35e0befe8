//! Error types for sequence materialization.

use thiserror::Error;

/// Error produced by a fallible callback or source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure while materializing or consuming an [`AsyncArray`](crate::AsyncArray).
///
/// An error aborts the whole pass: no partial results are returned and later
/// stages never run.
#[derive(Debug, Error)]
pub enum SeqError {
    /// A user callback failed.
    #[error("{stage} callback failed at index {index}: {source}")]
    Callback {
        /// Operator or terminal the callback belongs to.
        stage: &'static str,
        /// Stage-relative index of the element being processed.
        index: usize,
        source: BoxError,
    },

    /// The underlying source stream failed.
    #[error("source failed: {0}")]
    Source(#[source] BoxError),
}

impl SeqError {
    pub fn callback(stage: &'static str, index: usize, source: impl Into<BoxError>) -> Self {
        SeqError::Callback {
            stage,
            index,
            source: source.into(),
        }
    }

    pub fn stream(error: impl Into<BoxError>) -> Self {
        SeqError::Source(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn callback_error_display() {
        let err = SeqError::callback("map", 3, "boom");
        assert_eq!(err.to_string(), "map callback failed at index 3: boom");
        assert!(err.source().is_some());
    }

    #[test]
    fn source_error_display() {
        let err = SeqError::stream("closed");
        assert_eq!(err.to_string(), "source failed: closed");
    }
}
