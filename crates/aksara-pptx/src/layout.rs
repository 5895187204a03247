//! Slide geometry
//!
//! Everything is computed in inches and converted to EMU at the end.
//! Percentages follow CSS: horizontal properties are relative to the slide
//! width, vertical ones to the slide height.

use aksara_ast::Placement;

use crate::constants::{EMU_PER_CM, EMU_PER_INCH, EMU_PER_POINT, PX_PER_INCH};
use crate::slide::{plain_text, Frame, Paragraph};

/// Outer margin around the body region
pub const MARGIN_IN: f64 = 0.5;
/// Height of the header and footer bands
pub const BAND_IN: f64 = 0.35;
/// Height of the slide title box
pub const TITLE_IN: f64 = 0.9;
/// Vertical gap between flow shapes
pub const GAP_IN: f64 = 0.12;
/// Table row height
pub const ROW_IN: f64 = 0.4;
/// Width share of the slide used when an image gives no size at all
const DEFAULT_IMAGE_SHARE: f64 = 0.4;
/// Width over height assumed when image bytes cannot be sized
const FALLBACK_ASPECT: f64 = 4.0 / 3.0;

/// A rectangle in inches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn to_frame(self) -> Frame {
        Frame::new(emu(self.x), emu(self.y), emu(self.w.max(0.0)), emu(self.h.max(0.0)))
    }
}

/// Inches to EMU
pub fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH as f64).round() as i64
}

/// A CSS length in inches; percentages and bare numbers are of `extent`
///
/// Returns `None` for `auto` and for units that have no fixed size.
pub fn length_in(value: &str, extent: f64) -> Option<f64> {
    let value = value.trim();
    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let n: f64 = number.parse().ok()?;

    let inches = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "%" => n / 100.0 * extent,
        "px" => n / PX_PER_INCH,
        "in" => n,
        "cm" => n * EMU_PER_CM as f64 / EMU_PER_INCH as f64,
        "mm" => n * EMU_PER_CM as f64 / 10.0 / EMU_PER_INCH as f64,
        "pt" => n * EMU_PER_POINT as f64 / EMU_PER_INCH as f64,
        "pc" => n * 12.0 * EMU_PER_POINT as f64 / EMU_PER_INCH as f64,
        _ => return None,
    };
    Some(inches)
}

/// Frame of an absolutely positioned image
///
/// A missing edge is derived from the image's aspect ratio. With neither
/// width nor height the image keeps its pixel size, shrunk to fit the slide.
pub fn place_image(placement: &Placement, slide: (f64, f64), intrinsic: Option<(u32, u32)>) -> Rect {
    let (sw, sh) = slide;
    let horizontal = |v: &Option<String>| v.as_deref().and_then(|v| length_in(v, sw));
    let vertical = |v: &Option<String>| v.as_deref().and_then(|v| length_in(v, sh));

    let (left, right, width) = (
        horizontal(&placement.left),
        horizontal(&placement.right),
        horizontal(&placement.width),
    );
    let (top, bottom, height) = (
        vertical(&placement.top),
        vertical(&placement.bottom),
        vertical(&placement.height),
    );

    let width = width.or(match (left, right) {
        (Some(l), Some(r)) => Some(sw - l - r),
        _ => None,
    });
    let height = height.or(match (top, bottom) {
        (Some(t), Some(b)) => Some(sh - t - b),
        _ => None,
    });

    let (w, h) = sized(width, height, intrinsic, (sw, sh));
    let x = left.or(right.map(|r| sw - r - w)).unwrap_or(0.0);
    let y = top.or(bottom.map(|b| sh - b - h)).unwrap_or(0.0);
    Rect::new(x, y, w, h)
}

/// Frame of an in-flow image inside `area`
///
/// The top-left corner is the area's; `placement` sizes the image the way
/// [`place_image`] does and the result is shrunk to fit the area.
pub fn flow_image(
    placement: &Placement,
    slide: (f64, f64),
    area: Rect,
    intrinsic: Option<(u32, u32)>,
) -> Rect {
    let width = placement.width.as_deref().and_then(|v| length_in(v, slide.0));
    let height = placement.height.as_deref().and_then(|v| length_in(v, slide.1));
    let (w, h) = sized(width, height, intrinsic, slide);
    let (w, h) = fit(w, h, area.w, area.h.max(0.0));
    Rect::new(area.x, area.y, w, h)
}

fn sized(
    width: Option<f64>,
    height: Option<f64>,
    intrinsic: Option<(u32, u32)>,
    slide: (f64, f64),
) -> (f64, f64) {
    let aspect = intrinsic
        .filter(|(w, h)| *w > 0 && *h > 0)
        .map(|(w, h)| w as f64 / h as f64)
        .unwrap_or(FALLBACK_ASPECT);

    match (width, height) {
        (Some(w), Some(h)) => (w.max(0.0), h.max(0.0)),
        (Some(w), None) => (w.max(0.0), w.max(0.0) / aspect),
        (None, Some(h)) => (h.max(0.0) * aspect, h.max(0.0)),
        (None, None) => match intrinsic.filter(|(w, h)| *w > 0 && *h > 0) {
            Some((w, h)) => fit(w as f64 / PX_PER_INCH, h as f64 / PX_PER_INCH, slide.0, slide.1),
            None => {
                let w = slide.0 * DEFAULT_IMAGE_SHARE;
                (w, w / aspect)
            }
        },
    }
}

/// Scale down uniformly so `(w, h)` fits in `(max_w, max_h)`
pub fn fit(w: f64, h: f64, max_w: f64, max_h: f64) -> (f64, f64) {
    if w <= 0.0 || h <= 0.0 {
        return (w.max(0.0), h.max(0.0));
    }
    let scale = (max_w / w).min(max_h / h).min(1.0).max(0.0);
    (w * scale, h * scale)
}

/// Font size in points for a paragraph given the body size
pub fn font_size(paragraph: &Paragraph, base: u32) -> u32 {
    let scale = match paragraph {
        Paragraph::Heading { level: 1, .. } => 1.8,
        Paragraph::Heading { level: 2, .. } => 1.45,
        Paragraph::Heading { level: 3, .. } => 1.2,
        Paragraph::Heading { .. } => 1.05,
        Paragraph::Code(_) => 0.8,
        _ => 1.0,
    };
    (base as f64 * scale).round() as u32
}

/// Estimated height of a text box holding `paragraphs`
///
/// Average glyph width is taken as half the font size.
pub fn text_height(paragraphs: &[Paragraph], width: f64, base: u32) -> f64 {
    const INSETS_IN: f64 = 0.1;

    let body: f64 = paragraphs
        .iter()
        .map(|p| {
            let size = font_size(p, base) as f64;
            let (text, indent) = match p {
                Paragraph::Heading { runs, .. } | Paragraph::Text(runs) => (plain_text(runs), 0.0),
                Paragraph::Bullet { level, runs, .. } => {
                    (plain_text(runs), 0.375 * (*level as f64 + 1.0))
                }
                Paragraph::Code(line) => (line.clone(), 0.0),
            };
            let per_line = (((width - indent).max(0.5) * 72.0) / (size * 0.5)).max(1.0);
            let lines: f64 = text
                .split('\n')
                .map(|line| (line.chars().count() as f64 / per_line).ceil().max(1.0))
                .sum();
            lines * size * 1.2 / 72.0 + size * 0.3 / 72.0
        })
        .sum();

    body + INSETS_IN
}

/// Top-to-bottom placement of flow shapes
#[derive(Debug, Clone, Copy)]
pub struct FlowCursor {
    area: Rect,
    y: f64,
}

impl FlowCursor {
    pub fn new(area: Rect) -> Self {
        Self { area, y: area.y }
    }

    /// What is left of the area below the cursor
    pub fn remaining(&self) -> Rect {
        Rect::new(self.area.x, self.y, self.area.w, (self.area.bottom() - self.y).max(0.0))
    }

    /// Reserve `height` at the cursor
    pub fn take(&mut self, height: f64) -> Rect {
        let rect = Rect::new(self.area.x, self.y, self.area.w, height);
        self.advance(height);
        rect
    }

    pub fn advance(&mut self, height: f64) {
        self.y += height + GAP_IN;
    }
}

/// Regions of one slide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideRegions {
    pub header: Rect,
    pub title: Rect,
    pub body: Rect,
    pub footer: Rect,
    pub number: Rect,
}

impl SlideRegions {
    /// Split a slide; a band without items gives its space to the body
    pub fn new(slide: (f64, f64), has_header: bool, has_title: bool, has_footer: bool) -> Self {
        let (sw, sh) = slide;
        let inner_w = (sw - 2.0 * MARGIN_IN).max(0.0);

        let header = Rect::new(MARGIN_IN, MARGIN_IN / 2.0, inner_w, BAND_IN);
        let footer = Rect::new(MARGIN_IN, sh - MARGIN_IN / 2.0 - 2.0 * BAND_IN, inner_w, BAND_IN);
        let number = Rect::new(sw - MARGIN_IN - 1.0, sh - MARGIN_IN / 2.0 - BAND_IN, 1.0, BAND_IN);

        let mut top = if has_header { header.bottom() + GAP_IN } else { MARGIN_IN };
        let title = Rect::new(MARGIN_IN, top, inner_w, TITLE_IN);
        if has_title {
            top = title.bottom() + GAP_IN;
        }
        let bottom = if has_footer { footer.y - GAP_IN } else { sh - MARGIN_IN };

        Self {
            header,
            title,
            body: Rect::new(MARGIN_IN, top, inner_w, (bottom - top).max(0.0)),
            footer,
            number,
        }
    }
}
