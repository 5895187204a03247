//! PDF conversion driver

use std::time::Duration;

use aksara_core::diagnostics::{codes, Diagnostic};
use aksara_core::settings::PdfSettings;
use aksara_core::DocumentModel;
use tracing::{info, warn};

use crate::browser::{wait_until, Browser, PrintOptions, Session};
use crate::error::Result;
use crate::print::print_document;

/// Bounded waits applied before capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfOptions {
    pub image_timeout: Duration,
    pub diagram_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            image_timeout: Duration::from_millis(10_000),
            diagram_timeout: Duration::from_millis(5_000),
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl From<&PdfSettings> for PdfOptions {
    fn from(settings: &PdfSettings) -> Self {
        Self {
            image_timeout: Duration::from_millis(settings.image_timeout_ms),
            diagram_timeout: Duration::from_millis(settings.diagram_timeout_ms),
            poll_interval: Duration::from_millis(settings.poll_interval_ms.max(1)),
        }
    }
}

/// PDF bytes plus the degradations met on the way
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Renders a model to PDF through a [`Browser`]
pub struct PdfRenderer<B> {
    browser: B,
    options: PdfOptions,
}

impl<B: Browser> PdfRenderer<B> {
    pub fn new(browser: B) -> Self {
        Self {
            browser,
            options: PdfOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PdfOptions) -> Self {
        self.options = options;
        self
    }

    /// Load the print layout, wait for images and diagrams, capture
    ///
    /// The browser session is closed on every path. A wait that runs out
    /// adds a warning and printing goes ahead.
    pub fn render(&self, model: &DocumentModel) -> Result<RenderedPdf> {
        let mut diagnostics = Vec::new();
        let html = print_document(model, &mut diagnostics);
        let (width, height) = model.geometry.print_size();

        let mut session = Session::open(&self.browser)?;
        session.page().set_content(&html)?;

        let images = wait_until(self.options.image_timeout, self.options.poll_interval, || {
            session.page().images_loaded()
        })?;
        if !images {
            warn!(timeout = ?self.options.image_timeout, "images still loading, printing anyway");
            diagnostics.push(
                Diagnostic::warning(format!(
                    "images did not finish loading within {} ms",
                    self.options.image_timeout.as_millis()
                ))
                .with_code(codes::IMAGE_TIMEOUT),
            );
        }

        if model.has_diagrams() {
            let drawn = wait_until(self.options.diagram_timeout, self.options.poll_interval, || {
                session.page().diagrams_ready()
            })?;
            if !drawn {
                warn!(timeout = ?self.options.diagram_timeout, "diagrams not rendered, printing anyway");
                diagnostics.push(
                    Diagnostic::warning(format!(
                        "diagrams did not finish rendering within {} ms",
                        self.options.diagram_timeout.as_millis()
                    ))
                    .with_code(codes::DIAGRAM_TIMEOUT),
                );
            }
        }

        let bytes = session.page().print_pdf(&PrintOptions {
            width: width.clone(),
            height: height.clone(),
            print_background: true,
        })?;
        session.close()?;

        info!(bytes = bytes.len(), width = %width, height = %height, "rendered pdf");
        Ok(RenderedPdf { bytes, diagnostics })
    }
}
