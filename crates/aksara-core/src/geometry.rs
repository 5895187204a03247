//! Page geometry
//!
//! One resolver for every backend. The `size` directive (or an options
//! preset, or the kind default) becomes a [`PageGeometry`], and each backend
//! asks it for lengths in its own unit system:
//!
//! | Form            | CSS              | Print            | Slide                 |
//! |-----------------|------------------|------------------|-----------------------|
//! | `210mmx297mm`   | `210mm × 297mm`  | `210mm × 297mm`  | nearest fixed layout  |
//! | `16:9`          | `1920px × 1080px`| `29.7cm × 16.71cm`| `10in × 5.625in`     |

use std::fmt;
use std::sync::OnceLock;

use aksara_ast::{DocumentKind, Orientation};
use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::diagnostics::{codes, Diagnostic};

/// Long edge of a ratio page in CSS pixels
pub const CSS_LONG_EDGE_PX: f64 = 1920.0;
/// Long edge of a ratio page in centimetres
pub const PRINT_LONG_EDGE_CM: f64 = 29.7;
/// Long edge of a ratio slide in inches
pub const SLIDE_LONG_EDGE_IN: f64 = 10.0;

const MM_PER_INCH: f64 = 25.4;

/// Fixed slide layouts, landscape `(name, width_in, height_in)`
pub const SLIDE_LAYOUTS: &[(&str, f64, f64)] = &[
    ("16x9", 10.0, 5.625),
    ("16x10", 10.0, 6.25),
    ("4x3", 10.0, 7.5),
    ("WIDE", 13.333, 7.5),
];

/// Named physical presets, portrait `(name, width_mm, height_mm)`
const PAPER_PRESETS: &[(&str, f64, f64)] = &[
    ("a3", 297.0, 420.0),
    ("a4", 210.0, 297.0),
    ("a5", 148.0, 210.0),
    ("letter", 215.9, 279.4),
    ("legal", 215.9, 355.6),
];

#[derive(Debug, Clone, PartialEq)]
enum Extent {
    /// Physical size; the strings are reused verbatim by CSS and print
    Physical {
        width: String,
        height: String,
        width_mm: f64,
        height_mm: f64,
    },
    /// Aspect ratio with a backend-specific fixed long edge
    Ratio { w: f64, h: f64 },
}

/// Slide dimensions in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlideSize {
    pub width_in: f64,
    pub height_in: f64,
    /// Fixed layout name, or `custom` for ratio slides
    pub layout: &'static str,
}

/// Resolved page size
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    extent: Extent,
}

impl PageGeometry {
    /// A4 portrait
    pub fn a4() -> Self {
        Self::physical_mm(210.0, 297.0)
    }

    /// 16:9 landscape
    pub fn widescreen() -> Self {
        Self {
            extent: Extent::Ratio { w: 16.0, h: 9.0 },
        }
    }

    /// Default geometry for a document kind
    pub fn for_kind(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Document => Self::a4(),
            DocumentKind::Presentation => Self::widescreen(),
        }
    }

    fn physical_mm(width_mm: f64, height_mm: f64) -> Self {
        Self {
            extent: Extent::Physical {
                width: format!("{}mm", fmt_len(width_mm)),
                height: format!("{}mm", fmt_len(height_mm)),
                width_mm,
                height_mm,
            },
        }
    }

    /// Parse `WIDTHmmxHEIGHTmm` or `W:H`
    pub fn parse(size: &str) -> Option<Self> {
        static ABS_RE: OnceLock<Regex> = OnceLock::new();
        static RATIO_RE: OnceLock<Regex> = OnceLock::new();

        let abs = ABS_RE.get_or_init(|| {
            Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*mm\s*[xX×]\s*(\d+(?:\.\d+)?)\s*mm\s*$").unwrap()
        });
        let ratio = RATIO_RE
            .get_or_init(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*:\s*(\d+(?:\.\d+)?)\s*$").unwrap());

        if let Some(cap) = abs.captures(size) {
            let width_mm: f64 = cap[1].parse().ok()?;
            let height_mm: f64 = cap[2].parse().ok()?;
            if width_mm <= 0.0 || height_mm <= 0.0 {
                return None;
            }
            return Some(Self {
                extent: Extent::Physical {
                    width: format!("{}mm", &cap[1]),
                    height: format!("{}mm", &cap[2]),
                    width_mm,
                    height_mm,
                },
            });
        }

        if let Some(cap) = ratio.captures(size) {
            let w: f64 = cap[1].parse().ok()?;
            let h: f64 = cap[2].parse().ok()?;
            if w <= 0.0 || h <= 0.0 {
                return None;
            }
            return Some(Self {
                extent: Extent::Ratio { w, h },
            });
        }

        None
    }

    /// Look up a named preset (`A4`, `Letter`, `16:9`...) or parse a size
    pub fn preset(name: &str) -> Option<Self> {
        let key = name.trim().to_ascii_lowercase();
        PAPER_PRESETS
            .iter()
            .find(|(preset, _, _)| *preset == key)
            .map(|(_, w, h)| Self::physical_mm(*w, *h))
            .or_else(|| Self::parse(name))
    }

    /// Resolve with precedence: `size` directive, options preset, kind default
    pub fn resolve(
        size: Option<&str>,
        preset: Option<&str>,
        orientation: Option<Orientation>,
        kind: DocumentKind,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Self {
        if let Some(size) = size {
            match Self::parse(size) {
                Some(geometry) => return geometry,
                None => {
                    warn!(size, "cannot parse page size, using default");
                    diagnostics.push(
                        Diagnostic::warning(format!("cannot parse page size `{size}`"))
                            .with_code(codes::PAGE_SIZE)
                            .with_target(size)
                            .with_help("use `WIDTHmmxHEIGHTmm` or `W:H`"),
                    );
                }
            }
        }

        let base = match preset {
            Some(name) => Self::preset(name).unwrap_or_else(|| {
                warn!(preset = name, "unknown page size preset, using default");
                diagnostics.push(
                    Diagnostic::warning(format!("unknown page size preset `{name}`"))
                        .with_code(codes::PAGE_SIZE)
                        .with_target(name),
                );
                Self::for_kind(kind)
            }),
            None => Self::for_kind(kind),
        };

        match orientation {
            Some(o) => base.oriented(o),
            None => base,
        }
    }

    /// Swap the edges if the page disagrees with `orientation`
    pub fn oriented(self, orientation: Orientation) -> Self {
        let wants_landscape = orientation == Orientation::Landscape;
        if self.is_landscape() == wants_landscape || self.is_square() {
            return self;
        }
        let extent = match self.extent {
            Extent::Physical {
                width,
                height,
                width_mm,
                height_mm,
            } => Extent::Physical {
                width: height,
                height: width,
                width_mm: height_mm,
                height_mm: width_mm,
            },
            Extent::Ratio { w, h } => Extent::Ratio { w: h, h: w },
        };
        Self { extent }
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f64 {
        match &self.extent {
            Extent::Physical {
                width_mm,
                height_mm,
                ..
            } => width_mm / height_mm,
            Extent::Ratio { w, h } => w / h,
        }
    }

    pub fn is_landscape(&self) -> bool {
        self.aspect_ratio() > 1.0
    }

    fn is_square(&self) -> bool {
        (self.aspect_ratio() - 1.0).abs() < f64::EPSILON
    }

    /// Whether the size came from a ratio rather than physical lengths
    pub fn is_ratio(&self) -> bool {
        matches!(self.extent, Extent::Ratio { .. })
    }

    /// Unit-agnostic width in millimetres
    pub fn width_mm(&self) -> f64 {
        match &self.extent {
            Extent::Physical { width_mm, .. } => *width_mm,
            Extent::Ratio { .. } => scaled(PRINT_LONG_EDGE_CM * 10.0, self.aspect_ratio()).0,
        }
    }

    /// Unit-agnostic height in millimetres
    pub fn height_mm(&self) -> f64 {
        match &self.extent {
            Extent::Physical { height_mm, .. } => *height_mm,
            Extent::Ratio { .. } => scaled(PRINT_LONG_EDGE_CM * 10.0, self.aspect_ratio()).1,
        }
    }

    /// CSS width and height for the interactive view
    pub fn css_size(&self) -> (String, String) {
        match &self.extent {
            Extent::Physical { width, height, .. } => (width.clone(), height.clone()),
            Extent::Ratio { .. } => with_unit(scaled(CSS_LONG_EDGE_PX, self.aspect_ratio()), "px"),
        }
    }

    /// Paper width and height for print
    pub fn print_size(&self) -> (String, String) {
        match &self.extent {
            Extent::Physical { width, height, .. } => (width.clone(), height.clone()),
            Extent::Ratio { .. } => {
                with_unit(scaled(PRINT_LONG_EDGE_CM, self.aspect_ratio()), "cm")
            }
        }
    }

    /// Slide size in inches
    pub fn slide_size(&self) -> SlideSize {
        match &self.extent {
            Extent::Ratio { .. } => {
                let (width_in, height_in) = scaled(SLIDE_LONG_EDGE_IN, self.aspect_ratio());
                SlideSize {
                    width_in,
                    height_in,
                    layout: "custom",
                }
            }
            Extent::Physical { .. } => nearest_layout(self.aspect_ratio()),
        }
    }

    /// Print width and height in inches
    pub fn print_size_in(&self) -> (f64, f64) {
        (self.width_mm() / MM_PER_INCH, self.height_mm() / MM_PER_INCH)
    }
}

impl fmt::Display for PageGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.print_size();
        write!(f, "{w} x {h}")
    }
}

/// Fixed long edge; short edge scaled by the ratio
fn scaled(long_edge: f64, ratio: f64) -> (f64, f64) {
    if ratio > 1.0 {
        (long_edge, long_edge / ratio)
    } else {
        (long_edge * ratio, long_edge)
    }
}

fn with_unit((w, h): (f64, f64), unit: &str) -> (String, String) {
    (format!("{}{unit}", fmt_len(w)), format!("{}{unit}", fmt_len(h)))
}

/// At most two decimals, trailing zeros trimmed
pub fn fmt_len(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

/// Closest fixed layout by aspect ratio, swapped for portrait pages
fn nearest_layout(ratio: f64) -> SlideSize {
    let portrait = ratio < 1.0;
    let landscape_ratio = if portrait { 1.0 / ratio } else { ratio };

    let (layout, w, h) = SLIDE_LAYOUTS
        .iter()
        .copied()
        .min_by(|a, b| {
            let da = (a.1 / a.2 - landscape_ratio).abs();
            let db = (b.1 / b.2 - landscape_ratio).abs();
            da.total_cmp(&db)
        })
        .unwrap_or(SLIDE_LAYOUTS[0]);

    if portrait {
        SlideSize {
            width_in: h,
            height_in: w,
            layout,
        }
    } else {
        SlideSize {
            width_in: w,
            height_in: h,
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(size: Option<&str>, kind: DocumentKind) -> (PageGeometry, Vec<Diagnostic>) {
        let mut diags = Vec::new();
        let g = PageGeometry::resolve(size, None, None, kind, &mut diags);
        (g, diags)
    }

    #[test]
    fn test_absolute_is_verbatim_for_css_and_print() {
        let (g, diags) = resolve(Some("210mmx297mm"), DocumentKind::Presentation);
        assert!(diags.is_empty());
        assert_eq!(g.css_size(), ("210mm".to_string(), "297mm".to_string()));
        assert_eq!(g.css_size(), g.print_size());
        assert!(!g.is_landscape());
    }

    #[test]
    fn test_ratio_landscape() {
        let (g, _) = resolve(Some("16:9"), DocumentKind::Document);
        assert_eq!(g.css_size(), ("1920px".to_string(), "1080px".to_string()));
        assert_eq!(g.print_size(), ("29.7cm".to_string(), "16.71cm".to_string()));
        let slide = g.slide_size();
        assert_eq!(slide.width_in, 10.0);
        assert!((slide.height_in - 5.625).abs() < 1e-9);
        assert!(g.is_landscape());
    }

    #[test]
    fn test_ratio_portrait() {
        let (g, _) = resolve(Some("3:4"), DocumentKind::Document);
        assert_eq!(g.css_size(), ("1440px".to_string(), "1920px".to_string()));
        assert_eq!(g.slide_size().height_in, 10.0);
        assert!((g.slide_size().width_in - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_defaults_per_kind() {
        let (doc, _) = resolve(None, DocumentKind::Document);
        assert_eq!(doc.print_size(), ("210mm".to_string(), "297mm".to_string()));
        let (deck, _) = resolve(None, DocumentKind::Presentation);
        assert_eq!(deck.css_size(), ("1920px".to_string(), "1080px".to_string()));
    }

    #[test]
    fn test_invalid_size_warns() {
        let (g, diags) = resolve(Some("huge"), DocumentKind::Document);
        assert_eq!(g, PageGeometry::a4());
        assert!(diags[0].has_code(codes::PAGE_SIZE));
        let (_, diags) = resolve(Some("0:9"), DocumentKind::Document);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_nearest_slide_layout() {
        let (a4, _) = resolve(None, DocumentKind::Document);
        let slide = a4.slide_size();
        assert_eq!(slide.layout, "4x3");
        assert_eq!((slide.width_in, slide.height_in), (7.5, 10.0));

        let (wide, _) = resolve(Some("338.67mmx190.5mm"), DocumentKind::Document);
        assert_eq!(wide.slide_size().layout, "16x9");
    }

    #[test]
    fn test_preset_and_orientation() {
        let mut diags = Vec::new();
        let g = PageGeometry::resolve(
            None,
            Some("Letter"),
            Some(Orientation::Landscape),
            DocumentKind::Document,
            &mut diags,
        );
        assert_eq!(g.print_size(), ("279.4mm".to_string(), "215.9mm".to_string()));

        let g = PageGeometry::resolve(
            None,
            Some("16:9"),
            Some(Orientation::Portrait),
            DocumentKind::Presentation,
            &mut diags,
        );
        assert_eq!(g.css_size(), ("1080px".to_string(), "1920px".to_string()));

        let g = PageGeometry::resolve(Some("4:3"), Some("A3"), None, DocumentKind::Document, &mut diags);
        assert!(g.is_ratio());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_unknown_preset() {
        let mut diags = Vec::new();
        let g = PageGeometry::resolve(None, Some("B9"), None, DocumentKind::Presentation, &mut diags);
        assert_eq!(g, PageGeometry::widescreen());
        assert!(diags[0].has_code(codes::PAGE_SIZE));
    }

    #[test]
    fn test_fmt_len() {
        assert_eq!(fmt_len(1080.0), "1080");
        assert_eq!(fmt_len(16.70625), "16.71");
        assert_eq!(fmt_len(5.5), "5.5");
    }
}
