//! # aksara-pptx
//!
//! PowerPoint (PPTX) output for aksara documents.
//!
//! Every section becomes one slide. The section's rendered HTML is read back
//! into a handful of structural items (title, heading, paragraph, list,
//! table, code, image), positioned images are converted from CSS lengths to
//! slide inches, and the result is written as an OOXML package.
//!
//! ## Features
//!
//! - **Layered images**: `wm`/`bg` pictures sit below the text, `fg`/`lg`
//!   above it, each at its CSS position
//! - **Running items**: header and footer text boxes with the page's
//!   alignment, plus a slide number label
//! - **Speaker notes**: `<!-- notes: ... -->` becomes a notes slide
//! - **Document background**: the `background` directive fills every slide
//!
//! ## Example
//!
//! ```rust,ignore
//! use aksara_pptx::render_pptx;
//! use aksara_core::settings::PptxSettings;
//!
//! let model = aksara_core::parse(text, &options);
//! let deck = render_pptx(&model, &PptxSettings::default())?;
//! std::fs::write("deck.pptx", deck.bytes)?;
//! ```

pub mod error;
pub mod layout;
pub mod reader;
pub mod renderer;
pub mod slide;
pub mod writer;

pub use error::{PptxError, Result};
pub use reader::{read_items, ImageItem, Item};
pub use renderer::{PptxRenderer, RenderedPptx};
pub use slide::{Deck, Frame, Media, Paragraph, Shape, Slide, TextRun};
pub use writer::{DeckWriter, PptxWriter};

use aksara_core::settings::PptxSettings;
use aksara_core::DocumentModel;

/// Render `model` with the built-in deck writer
pub fn render_pptx(model: &DocumentModel, settings: &PptxSettings) -> Result<RenderedPptx> {
    PptxRenderer::new(settings.clone()).render(model)
}

/// PPTX-related constants
pub mod constants {
    /// EMU per inch
    pub const EMU_PER_INCH: i64 = 914_400;

    /// EMU per point
    pub const EMU_PER_POINT: i64 = 12_700;

    /// EMU per centimeter
    pub const EMU_PER_CM: i64 = 360_000;

    /// CSS pixels per inch
    pub const PX_PER_INCH: f64 = 96.0;

    /// Hundredths of a point per point (for font sizes)
    pub const CENTIPOINTS_PER_POINT: u32 = 100;

    /// PresentationML namespace
    pub const NS_PRESENTATION: &str =
        "http://schemas.openxmlformats.org/presentationml/2006/main";

    /// DrawingML namespace
    pub const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    /// Relationships namespace
    pub const NS_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    /// Package relationships namespace
    pub const NS_PACKAGE_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships";

    /// Content Types namespace
    pub const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

    /// Slide relationship type
    pub const REL_TYPE_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

    /// Slide layout relationship type
    pub const REL_TYPE_SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

    /// Slide master relationship type
    pub const REL_TYPE_SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";

    /// Notes slide relationship type
    pub const REL_TYPE_NOTES_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";

    /// Theme relationship type
    pub const REL_TYPE_THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

    /// Image relationship type
    pub const REL_TYPE_IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

    /// Hyperlink relationship type
    pub const REL_TYPE_HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
}
