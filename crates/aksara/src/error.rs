//! Conversion failures and their result kinds

use aksara_ast::ConvertErrorKind;
use aksara_core::CoreError;
use aksara_pdf::PdfError;
use aksara_pptx::PptxError;
use thiserror::Error;

/// Result type for facade operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Anything that stops a conversion
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Strict metadata check or settings failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Browser collaborator failed
    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// Slide writer failed
    #[error(transparent)]
    Pptx(#[from] PptxError),
}

impl ConvertError {
    /// The kind reported in a failed [`ConvertResult`](aksara_ast::ConvertResult)
    pub fn kind(&self) -> ConvertErrorKind {
        match self {
            Self::Core(CoreError::UnresolvedMeta { .. }) => ConvertErrorKind::Strict,
            Self::Core(CoreError::Io(_)) => ConvertErrorKind::Io,
            Self::Core(_) => ConvertErrorKind::Internal,
            Self::Pdf(PdfError::Io(_)) => ConvertErrorKind::Io,
            Self::Pdf(_) => ConvertErrorKind::Backend,
            Self::Pptx(PptxError::IoError(_)) => ConvertErrorKind::Io,
            Self::Pptx(_) => ConvertErrorKind::Backend,
        }
    }

    /// Get the error code for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::Core(CoreError::UnresolvedMeta { .. }) => "CORE001",
            Self::Core(_) => "CORE002",
            Self::Pdf(e) => e.code(),
            Self::Pptx(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let strict: ConvertError = CoreError::unresolved_meta(["ref"]).into();
        assert_eq!(strict.kind(), ConvertErrorKind::Strict);
        assert_eq!(strict.code(), "CORE001");
        assert_eq!(strict.to_string(), "Unresolved metadata: ref");

        let browser: ConvertError = PdfError::BrowserNotFound.into();
        assert_eq!(browser.kind(), ConvertErrorKind::Backend);
        assert_eq!(browser.code(), "PDF001");

        let deck: ConvertError = PptxError::EmptyDeck.into();
        assert_eq!(deck.kind(), ConvertErrorKind::Backend);

        let io: ConvertError =
            PptxError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full")).into();
        assert_eq!(io.kind(), ConvertErrorKind::Io);
    }
}
