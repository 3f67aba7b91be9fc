//! Error types for topic-to-deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// A required setting is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The search collaborator was unreachable or returned a non-success status.
    #[error("Search failed: {0}")]
    Retrieval(String),

    /// A single candidate page could not be fetched or parsed.
    #[error("Failed to extract {url}: {message}")]
    Extraction { url: String, message: String },

    /// The language model failed or returned output that does not match the outline schema.
    #[error("Outline synthesis failed: {0}")]
    Synthesis(String),

    /// The presentation could not be assembled or written.
    #[error("Render error: {0}")]
    Render(String),

    /// A presentation file could not be read back.
    #[error("Invalid presentation: {0}")]
    InvalidDeck(String),

    /// Failed to read or write a local file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an extraction failure for `url`.
    pub fn extraction(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Extraction {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Whether the run can continue past this error.
    ///
    /// Only per-page extraction failures are recovered; every other kind aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Extraction { .. })
    }
}
