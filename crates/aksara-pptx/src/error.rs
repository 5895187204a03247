//! Error types for PPTX generation.

use thiserror::Error;

/// Result type for PPTX operations
pub type Result<T> = std::result::Result<T, PptxError>;

/// Errors that can occur during PPTX generation
#[derive(Error, Debug)]
pub enum PptxError {
    /// A slide references media that was never registered
    #[error("Unknown media index {index} on slide {slide}")]
    UnknownMedia { index: usize, slide: usize },

    /// The deck has nothing to write
    #[error("Deck has no slides")]
    EmptyDeck,

    /// ZIP archive error
    #[error("Archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PptxError {
    /// Create an unknown media error
    pub fn unknown_media(index: usize, slide: usize) -> Self {
        Self::UnknownMedia { index, slide }
    }

    /// Get the error code for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownMedia { .. } => "PPTX001",
            Self::EmptyDeck => "PPTX002",
            Self::ZipError(_) => "PPTX003",
            Self::IoError(_) => "PPTX004",
        }
    }
}
