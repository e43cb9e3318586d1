//! Error types for the engine crate.

/// Errors that occur when loading or decoding an opening book.
#[derive(Debug, thiserror::Error)]
pub enum BookError {
    /// The book file could not be read.
    #[error("failed to read opening book: {0}")]
    Io(#[from] std::io::Error),
    /// The book is not valid JSON or does not match the book layout.
    #[error("malformed opening book: {0}")]
    Json(#[from] serde_json::Error),
    /// A position key is not a decimal position hash.
    #[error("invalid position key: \"{key}\"")]
    InvalidKey {
        /// The offending key.
        key: String,
    },
}
