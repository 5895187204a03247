//! Error types for PDF generation

use thiserror::Error;

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Errors that can occur during PDF generation
#[derive(Error, Debug)]
pub enum PdfError {
    /// No usable browser executable
    #[error("No headless browser found (set [pdf] browser in aksara.toml or AKSARA_BROWSER)")]
    BrowserNotFound,

    /// Browser process could not be started
    #[error("Browser launch failed: {reason}")]
    Launch { reason: String },

    /// Page content could not be loaded
    #[error("Cannot load page content: {reason}")]
    Content { reason: String },

    /// Browser did not produce a PDF
    #[error("PDF capture failed: {reason}")]
    Print { reason: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PdfError {
    /// Create a launch error
    pub fn launch(reason: impl Into<String>) -> Self {
        Self::Launch {
            reason: reason.into(),
        }
    }

    /// Create a content error
    pub fn content(reason: impl Into<String>) -> Self {
        Self::Content {
            reason: reason.into(),
        }
    }

    /// Create a print error
    pub fn print(reason: impl Into<String>) -> Self {
        Self::Print {
            reason: reason.into(),
        }
    }

    /// Get the error code for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::BrowserNotFound => "PDF001",
            Self::Launch { .. } => "PDF002",
            Self::Content { .. } => "PDF003",
            Self::Print { .. } => "PDF004",
            Self::Io(_) => "PDF005",
        }
    }
}
