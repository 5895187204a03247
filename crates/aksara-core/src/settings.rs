//! Project settings loaded from `aksara.toml`
//!
//! ```toml
//! [defaults]
//! format = "pdf"
//! theme = "dark"
//! locale = "id-ID"
//!
//! [pdf]
//! browser = "/usr/bin/chromium"
//! image_timeout_ms = 10000
//!
//! [pptx]
//! font_face = "Calibri"
//! ```

use std::path::{Path, PathBuf};

use aksara_ast::{ConvertOptions, OutputFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// File name searched for by [`Settings::discover`]
pub const SETTINGS_FILE: &str = "aksara.toml";

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Conversion defaults
    pub defaults: DefaultSettings,
    /// PDF backend settings
    pub pdf: PdfSettings,
    /// Slide writer settings
    pub pptx: PptxSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Read and parse a settings file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Find `aksara.toml` in `dir` or one of its ancestors
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        dir.ancestors()
            .map(|d| d.join(SETTINGS_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Serialize to TOML, used by `init-config`
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Conversion options seeded from the defaults table
    ///
    /// `format` overrides the configured default format.
    pub fn convert_options(&self, format: Option<OutputFormat>) -> ConvertOptions {
        let d = &self.defaults;
        ConvertOptions {
            format: format.or(d.format).unwrap_or_default(),
            theme: d.theme.clone(),
            locale: d.locale.clone(),
            page_size: d.page_size.clone(),
            embed_images: d.embed_images,
            strict_meta: d.strict_meta,
            ..Default::default()
        }
    }
}

/// Defaults applied to every conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSettings {
    /// Output format when none is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    /// Built-in theme
    pub theme: String,
    /// Locale for `toLocaleDateString()` without an argument
    pub locale: String,
    /// Page-size preset used when a document has no `size` directive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<String>,
    /// Embed images as data URIs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_images: Option<bool>,
    /// Fail on unresolved `${meta.*}` references
    pub strict_meta: bool,
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            format: None,
            theme: "default".to_string(),
            locale: "en-US".to_string(),
            page_size: None,
            embed_images: None,
            strict_meta: false,
        }
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfSettings {
    /// Browser executable; searched on `PATH` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    /// Upper bound on waiting for images
    pub image_timeout_ms: u64,
    /// Upper bound on waiting for diagrams
    pub diagram_timeout_ms: u64,
    /// Delay between readiness polls
    pub poll_interval_ms: u64,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            browser: None,
            image_timeout_ms: 10_000,
            diagram_timeout_ms: 5_000,
            poll_interval_ms: 100,
        }
    }
}

/// Slide writer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PptxSettings {
    /// Body font face
    pub font_face: String,
    /// Body font size in points
    pub font_size: u32,
    /// Draw a slide-number label in the corner
    pub show_slide_number: bool,
}

impl Default for PptxSettings {
    fn default() -> Self {
        Self {
            font_face: "Calibri".to_string(),
            font_size: 18,
            show_slide_number: true,
        }
    }
}
