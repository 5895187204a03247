//! aksara-pdf - PDF generation via a headless browser
//!
//! The PDF pipeline has three stages:
//!
//! 1. **Print layout** - every section as a stacked page with a page break,
//!    `@page` sized from the resolved geometry, assets inlined
//! 2. **Load** - the browser loads the page; image and diagram readiness
//!    are polled with a bound and degrade to warnings on timeout
//! 3. **Capture** - the browser prints the page to PDF bytes
//!
//! The browser is a collaborator behind the [`Browser`] trait. [`ChromeCli`]
//! drives an installed Chrome or Chromium.
//!
//! # Example
//!
//! ```ignore
//! use aksara_pdf::{render_pdf, ChromeCli};
//!
//! let model = aksara_core::parse(text, &options);
//! let browser = ChromeCli::discover(None)?;
//! let pdf = render_pdf(&model, browser)?;
//! std::fs::write("out.pdf", pdf.bytes)?;
//! ```

pub mod browser;
mod chrome;
mod error;
mod print;
mod renderer;

pub use browser::{Browser, BrowserPage, PrintOptions, Session};
pub use chrome::{ChromeCli, BROWSER_ENV};
pub use error::{PdfError, Result};
pub use print::print_document;
pub use renderer::{PdfOptions, PdfRenderer, RenderedPdf};

use aksara_core::DocumentModel;

/// Render `model` with default wait limits
pub fn render_pdf<B: Browser>(model: &DocumentModel, browser: B) -> Result<RenderedPdf> {
    PdfRenderer::new(browser).render(model)
}
