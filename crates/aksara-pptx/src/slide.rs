//! Slide descriptors handed to a deck writer.
//!
//! Everything here is already laid out: frames are in EMU, media is
//! registered once per deck and referenced by index.

use aksara_core::ItemAlign;

/// Position and size of a shape in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Frame {
    pub fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }
}

/// A run of text with consistent formatting
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
    pub monospace: bool,
    /// Hyperlink target
    pub link: Option<String>,
    /// Line break after this run
    pub line_break: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            ..Default::default()
        }
    }
}

/// Concatenated text of a run list
pub fn plain_text(runs: &[TextRun]) -> String {
    runs.iter()
        .map(|r| {
            if r.line_break {
                format!("{}\n", r.text)
            } else {
                r.text.clone()
            }
        })
        .collect()
}

/// One paragraph inside a text box
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paragraph {
    /// Section heading; level 1-4
    Heading { level: u8, runs: Vec<TextRun> },
    Text(Vec<TextRun>),
    /// List item; `level` counts from 0
    Bullet {
        level: u8,
        ordered: bool,
        runs: Vec<TextRun>,
    },
    /// Preformatted line, rendered monospace
    Code(String),
}

/// A text shape
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub frame: Frame,
    pub paragraphs: Vec<Paragraph>,
    pub align: ItemAlign,
    /// Font size in points
    pub font_size: u32,
}

/// A table shape; cells are plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableShape {
    pub frame: Frame,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableShape {
    pub fn column_count(&self) -> usize {
        self.header
            .len()
            .max(self.rows.iter().map(Vec::len).max().unwrap_or(0))
    }
}

/// A picture shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureShape {
    pub frame: Frame,
    /// Index into [`Deck::media`]
    pub media: usize,
    /// Accessible description
    pub description: String,
}

/// Anything placed on a slide, drawn in list order
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Text(TextBox),
    Table(TableShape),
    Picture(PictureShape),
}

/// One slide
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Slide {
    /// Slide number (1-based)
    pub number: usize,
    pub title: Option<String>,
    pub shapes: Vec<Shape>,
    /// Full-slide background picture, index into [`Deck::media`]
    pub background: Option<usize>,
    pub notes: Option<String>,
    /// Space-separated class hint carried from the section
    pub classes: Option<String>,
}

impl Slide {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    pub fn pictures(&self) -> impl Iterator<Item = &PictureShape> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Picture(p) => Some(p),
            _ => None,
        })
    }
}

/// An embedded media part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    /// Part name under `ppt/media/`, e.g. `image1.png`
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Media {
    pub fn extension(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or("bin")
    }
}

/// A complete deck ready for writing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Deck {
    /// Slide width and height in EMU
    pub size: (i64, i64),
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    /// Locale tag used on text runs
    pub lang: String,
    pub font_face: String,
    pub slides: Vec<Slide>,
    pub media: Vec<Media>,
}

impl Deck {
    /// Register media bytes, reusing an identical earlier part
    pub fn add_media(&mut self, data: Vec<u8>, content_type: &str, extension: &str) -> usize {
        if let Some(index) = self.media.iter().position(|m| m.data == data) {
            return index;
        }
        let index = self.media.len();
        self.media.push(Media {
            name: format!("image{}.{}", index + 1, extension),
            content_type: content_type.to_string(),
            data,
        });
        index
    }
}
