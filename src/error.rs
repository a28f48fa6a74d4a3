//! Error types for report generation.

use thiserror::Error;

/// Errors that can occur while streaming a report or building its document.
#[derive(Error, Debug)]
pub enum Error {
    /// The submitted topic was empty or whitespace only
    #[error("Topic must not be empty")]
    EmptyTopic,

    /// The submitted topic exceeds the accepted length
    #[error("Topic exceeds {max} characters")]
    TopicTooLong { max: usize },

    /// The request body could not be understood
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// External retrieval failed (never surfaced to stream consumers)
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// A stage failed while the stream was running
    #[error("Stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },

    /// A drained stream terminated with a failure event
    #[error("Report stream failed: {0}")]
    Stream(String),

    /// Layout could not place the document
    #[error("Layout error: {0}")]
    Layout(String),

    /// PDF object model or writer error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// I/O error while writing the artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error was caused by caller input rather than by the system.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyTopic | Error::TopicTooLong { .. } | Error::InvalidRequest(_)
        )
    }
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, Error>;
