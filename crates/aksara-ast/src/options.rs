//! Caller-supplied conversion options

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::DocumentMetadata;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Interactive scrollable page view
    #[default]
    Html,
    /// Print-accurate paginated file
    Pdf,
    /// Slide deck
    Pptx,
}

impl OutputFormat {
    /// MIME type of the produced bytes
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Html => "text/html",
            Self::Pdf => "application/pdf",
            Self::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }

    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
            Self::Pptx => "pptx",
        }
    }

    /// Whether images are embedded when the caller does not say
    ///
    /// The print and slide backends load from the byte stream, not from a
    /// live file system.
    pub fn embeds_images_by_default(&self) -> bool {
        !matches!(self, Self::Html)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(Self::Html),
            "pdf" => Ok(Self::Pdf),
            "pptx" | "ppt" => Ok(Self::Pptx),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Page orientation hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            other => Err(format!("unknown orientation: {other}")),
        }
    }
}

/// Options for one conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Requested output format
    pub format: OutputFormat,
    /// Built-in theme name
    pub theme: String,
    /// Default locale for date formatting
    pub locale: String,
    /// Named page-size preset, used when no `size` directive is present
    pub page_size: Option<String>,
    /// Orientation applied to the preset
    pub orientation: Option<Orientation>,
    /// Directory used to resolve relative asset paths
    pub base_path: Option<PathBuf>,
    /// Embed images as data URIs; `None` uses the per-format default
    pub embed_images: Option<bool>,
    /// Fail the conversion when a `${meta.*}` field is missing
    pub strict_meta: bool,
    /// Caller-provided metadata
    pub metadata: DocumentMetadata,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Html,
            theme: "default".to_string(),
            locale: "en-US".to_string(),
            page_size: None,
            orientation: None,
            base_path: None,
            embed_images: None,
            strict_meta: false,
            metadata: DocumentMetadata::default(),
        }
    }
}

impl ConvertOptions {
    /// Options for the given format with defaults elsewhere
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    /// Set the theme
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Set the locale
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the base path for relative assets
    pub fn with_base_path(mut self, base: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base.into());
        self
    }

    /// Force image embedding on or off
    pub fn with_embed_images(mut self, embed: bool) -> Self {
        self.embed_images = Some(embed);
        self
    }

    /// Set the caller metadata
    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Effective embedding flag
    pub fn should_embed_images(&self) -> bool {
        self.embed_images
            .unwrap_or_else(|| self.format.embeds_images_by_default())
    }
}
