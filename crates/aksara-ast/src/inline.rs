//! Inline elements for section content
//!
//! This module defines inline-level elements that appear within blocks,
//! such as text, formatting, links, and images, including the positional
//! image reference used for layered backgrounds and watermarks.

use serde::{Deserialize, Serialize};

/// Inline-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Inline {
    /// Plain text content (unescaped)
    Text(String),
    /// Formatted content (bold, italic, etc.)
    Format(FormatType, Box<Inline>),
    /// A span containing multiple inline elements
    Span(Vec<Inline>),
    /// A hyperlink
    Link(Link),
    /// An image, possibly positioned
    Image(ImageRef),
    /// A hard line break
    Break,
}

impl Inline {
    /// Wrap children in a format, avoiding a span for a single child
    pub fn format(format: FormatType, mut children: Vec<Inline>) -> Self {
        let inner = if children.len() == 1 {
            children.remove(0)
        } else {
            Inline::Span(children)
        };
        Inline::Format(format, Box::new(inner))
    }

    /// Concatenated text content, images contribute their alt text
    pub fn plain_text(&self) -> String {
        match self {
            Inline::Text(t) => t.clone(),
            Inline::Format(_, inner) => inner.plain_text(),
            Inline::Span(children) => children.iter().map(Inline::plain_text).collect(),
            Inline::Link(link) => link.text.iter().map(Inline::plain_text).collect(),
            Inline::Image(img) => img.alt.clone(),
            Inline::Break => "\n".to_string(),
        }
    }
}

/// Text formatting types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatType {
    /// Bold text
    Bold,
    /// Italic text
    Italic,
    /// Struck-through text
    Strikethrough,
    /// Monospace/code text
    Monospace,
}

/// A hyperlink element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// The URL target
    pub url: String,
    /// The link text (can contain nested inline elements)
    pub text: Vec<Inline>,
}

/// Stacking layer named by the first alt-text keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// `bg`: background container
    Background,
    /// `fg`: foreground picture above the background
    Foreground,
    /// `lg`: logo layer, topmost
    Logo,
    /// `wm`: watermark, beneath the background
    Watermark,
}

impl Layer {
    /// Parse the alt-text keyword
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "bg" => Some(Self::Background),
            "fg" => Some(Self::Foreground),
            "lg" => Some(Self::Logo),
            "wm" => Some(Self::Watermark),
            _ => None,
        }
    }

    /// The alt-text keyword
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Background => "bg",
            Self::Foreground => "fg",
            Self::Logo => "lg",
            Self::Watermark => "wm",
        }
    }

    /// CSS z-index of the layer
    pub fn z_index(&self) -> u8 {
        match self {
            Self::Watermark => 0,
            Self::Background => 1,
            Self::Foreground => 2,
            Self::Logo => 3,
        }
    }

    /// Whether the layer sits beneath section text
    pub fn is_backdrop(&self) -> bool {
        matches!(self, Self::Background | Self::Watermark)
    }
}

/// Placement tokens, each already normalised to a CSS length
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

impl Placement {
    /// Any of `t/r/b/l/x/y` was given
    pub fn has_position(&self) -> bool {
        self.top.is_some() || self.right.is_some() || self.bottom.is_some() || self.left.is_some()
    }

    /// Any of `w/h` was given
    pub fn has_size(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    /// Whether no token was given at all
    pub fn is_empty(&self) -> bool {
        !self.has_position() && !self.has_size()
    }

    /// `(property, value)` pairs in a fixed order
    pub fn declarations(&self) -> Vec<(&'static str, &str)> {
        [
            ("top", &self.top),
            ("right", &self.right),
            ("bottom", &self.bottom),
            ("left", &self.left),
            ("width", &self.width),
            ("height", &self.height),
        ]
        .into_iter()
        .filter_map(|(prop, value)| value.as_deref().map(|v| (prop, v)))
        .collect()
    }
}

/// How an image reference is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode {
    /// Full-bleed `bg`/`wm` container covering the page
    Backdrop,
    /// Absolutely positioned by `t/r/b/l`
    Positioned,
    /// Inline, sized by `w/h` with `object-fit: contain`
    Sized,
    /// Plain responsive inline image
    Inline,
}

/// An image reference parsed from `![<alt>](<src>)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Image source path, URL or data URI
    pub src: String,
    /// Accessible label with layer and placement tokens removed
    pub alt: String,
    /// Layer keyword, if the alt text began with one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<Layer>,
    /// Placement tokens
    #[serde(default)]
    pub placement: Placement,
}

impl ImageRef {
    /// A plain image without layer or placement
    pub fn plain(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            layer: None,
            placement: Placement::default(),
        }
    }

    /// Resolve the layout mode from layer and placement
    pub fn mode(&self) -> ImageMode {
        if self.placement.has_position() {
            return ImageMode::Positioned;
        }
        match self.layer {
            Some(layer) if layer.is_backdrop() && self.placement.is_empty() => ImageMode::Backdrop,
            _ if self.placement.has_size() => ImageMode::Sized,
            _ => ImageMode::Inline,
        }
    }

    /// z-index of the image, foreground when no layer was named
    pub fn z_index(&self) -> u8 {
        self.layer.unwrap_or(Layer::Foreground).z_index()
    }

    /// Whether the image leaves normal flow
    pub fn is_layered(&self) -> bool {
        matches!(self.mode(), ImageMode::Backdrop | ImageMode::Positioned)
    }
}
