//! # Error Types

use thiserror::Error;

/// Errors decoding or encoding a wire body.
#[derive(Debug, Error)]
pub enum WireError {
    /// Body is not valid JSON for the expected shape.
    #[error("Malformed {body}: {source}")]
    Malformed {
        /// Name of the body type.
        body: &'static str,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// Body could not be serialized.
    #[error("Failed to encode {body}: {source}")]
    Encode {
        /// Name of the body type.
        body: &'static str,
        /// Underlying serializer error.
        #[source]
        source: serde_json::Error,
    },
}
