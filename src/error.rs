//! Error types for the PDF extraction server

use thiserror::Error;

/// Result type alias for the PDF extraction server
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the PDF extraction server
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid PDF file
    #[error("Invalid PDF file: {reason}")]
    InvalidPdf { reason: String },

    /// PDFium error
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },

    /// Page range is neither "all" nor "start-end"
    #[error("Invalid page range format. Use 'all' or 'start-end' (e.g., '1-3')")]
    InvalidPageRange { range: String },

    /// Multipart body carried no file field
    #[error("No file was uploaded")]
    MissingUpload,

    /// Multipart body could not be read
    #[error("Failed to read upload: {reason}")]
    Multipart { reason: String },

    /// Gemini returned a non-success status
    #[error("Gemini API error ({status}): {body}")]
    Gemini { status: u16, body: String },

    /// Gemini answered without any text to parse
    #[error("Gemini response contained no text")]
    GeminiResponse,

    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Blocking task panicked or was cancelled
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl Error {
    /// Whether the error was caused by the request itself rather than by
    /// document decoding or an upstream service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidPageRange { .. })
    }
}
