//! Conversion entry points
//!
//! A [`Converter`] parses the text once, checks strict metadata, then hands
//! the model to the backend for the requested format. Backend errors are
//! caught here and become failed results; nothing else leaves a conversion
//! except a [`ConvertResult`].

use aksara_ast::{ConvertOptions, ConvertResult, OutputFormat};
use aksara_core::{parse, Diagnostic, DocumentModel, Settings};
use aksara_html::render_html;
use aksara_pdf::{Browser, ChromeCli, PdfOptions, PdfRenderer};
use aksara_pptx::PptxRenderer;
use tracing::{info, warn};

use crate::error::Result;

/// Bytes and degradations from one backend
struct Rendered {
    bytes: Vec<u8>,
    diagnostics: Vec<Diagnostic>,
}

/// Runs conversions with a fixed set of settings
pub struct Converter {
    settings: Settings,
    browser: Option<Box<dyn Browser>>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Converter {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            browser: None,
        }
    }

    /// Print PDFs through `browser` instead of a discovered Chrome
    pub fn with_browser(mut self, browser: impl Browser + 'static) -> Self {
        self.browser = Some(Box::new(browser));
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Parse `text` and render it in `options.format`
    pub fn convert(&self, text: &str, options: &ConvertOptions) -> ConvertResult {
        let model = parse(text, options);
        self.render(&model, options.format)
    }

    /// Render an already parsed model
    pub fn render(&self, model: &DocumentModel, format: OutputFormat) -> ConvertResult {
        match self.try_render(model, format) {
            Ok(rendered) => {
                let mut warnings = model.warnings();
                warnings.extend(rendered.diagnostics.iter().map(ToString::to_string));
                info!(
                    format = %format,
                    bytes = rendered.bytes.len(),
                    warnings = warnings.len(),
                    "conversion finished"
                );
                ConvertResult::success(rendered.bytes, format.mime_type()).with_warnings(warnings)
            }
            Err(err) => {
                warn!(format = %format, code = err.code(), error = %err, "conversion failed");
                ConvertResult::failure(err.kind(), err.to_string())
            }
        }
    }

    fn try_render(&self, model: &DocumentModel, format: OutputFormat) -> Result<Rendered> {
        model.check_strict()?;

        match format {
            OutputFormat::Html => {
                let out = render_html(model);
                Ok(Rendered {
                    bytes: out.html.into_bytes(),
                    diagnostics: out.diagnostics,
                })
            }
            OutputFormat::Pdf => {
                let options = PdfOptions::from(&self.settings.pdf);
                let out = match &self.browser {
                    Some(browser) => PdfRenderer::new(&**browser)
                        .with_options(options)
                        .render(model)?,
                    None => {
                        let chrome = ChromeCli::discover(self.settings.pdf.browser.as_deref())?;
                        PdfRenderer::new(chrome).with_options(options).render(model)?
                    }
                };
                Ok(Rendered {
                    bytes: out.bytes,
                    diagnostics: out.diagnostics,
                })
            }
            OutputFormat::Pptx => {
                let out = PptxRenderer::new(self.settings.pptx.clone()).render(model)?;
                Ok(Rendered {
                    bytes: out.bytes,
                    diagnostics: out.diagnostics,
                })
            }
        }
    }
}

/// Convert `text` with default settings
pub fn convert(text: &str, options: &ConvertOptions) -> ConvertResult {
    Converter::default().convert(text, options)
}

/// Render `model` as `format` with default settings
pub fn render(model: &DocumentModel, format: OutputFormat) -> ConvertResult {
    Converter::default().render(model, format)
}
