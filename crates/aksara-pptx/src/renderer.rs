//! Document model to slide deck
//!
//! One slide per section. Items read back from the section HTML are split
//! into layered pictures, which keep their CSS position, and flow content,
//! which is stacked top to bottom in the body region. Drawing order is
//! watermark, background, flow, foreground, logo.

use std::collections::HashMap;

use aksara_core::assets::{data_uri_mime, mime_for};
use aksara_core::diagnostics::{codes, Diagnostic};
use aksara_core::header_footer::RunningItem;
use aksara_core::settings::PptxSettings;
use aksara_core::{AssetResolver, DocumentModel, ItemAlign};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::layout::{
    emu, flow_image, place_image, text_height, FlowCursor, Rect, SlideRegions, ROW_IN,
};
use crate::reader::{inline_runs, read_items, ImageItem, ImageKind, Item};
use crate::slide::{
    plain_text, Deck, Paragraph, PictureShape, Shape, Slide, TableShape, TextBox, TextRun,
};
use crate::writer::{DeckWriter, PptxWriter};

/// Header and footer font size in points
const RUNNING_FONT_PT: u32 = 10;
/// Slide number font size in points
const NUMBER_FONT_PT: u32 = 9;

/// PPTX bytes plus the degradations met on the way
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPptx {
    pub bytes: Vec<u8>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Renders a model to a slide deck
pub struct PptxRenderer<W = PptxWriter> {
    settings: PptxSettings,
    writer: W,
}

impl PptxRenderer {
    pub fn new(settings: PptxSettings) -> Self {
        Self {
            settings,
            writer: PptxWriter,
        }
    }
}

impl<W: DeckWriter> PptxRenderer<W> {
    /// Use a different slide-file writer
    pub fn with_writer<V: DeckWriter>(self, writer: V) -> PptxRenderer<V> {
        PptxRenderer {
            settings: self.settings,
            writer,
        }
    }

    /// Lay out and write the deck
    pub fn render(&self, model: &DocumentModel) -> Result<RenderedPptx> {
        let mut diagnostics = Vec::new();
        let deck = self.build_deck(model, &mut diagnostics);
        let bytes = self.writer.write(&deck)?;

        info!(
            slides = deck.slides.len(),
            media = deck.media.len(),
            bytes = bytes.len(),
            "rendered pptx"
        );
        Ok(RenderedPptx { bytes, diagnostics })
    }

    /// Lay out every section as a slide
    pub fn build_deck(&self, model: &DocumentModel, diagnostics: &mut Vec<Diagnostic>) -> Deck {
        let size = model.geometry.slide_size();
        let slide = (size.width_in, size.height_in);

        let mut deck = Deck {
            size: (emu(slide.0), emu(slide.1)),
            title: model.title(),
            author: model.metadata.author.clone(),
            subject: model.metadata.subject.clone(),
            keywords: model.metadata.keywords.clone(),
            lang: model.options.locale.clone(),
            font_face: self.settings.font_face.clone(),
            ..Default::default()
        };
        debug!(width_in = slide.0, height_in = slide.1, layout = size.layout, "slide size");

        let mut media = MediaLoader::new(model);
        let background = model
            .directives
            .background
            .as_deref()
            .and_then(|src| media.load(src, &mut deck, None, diagnostics))
            .map(|(index, _)| index);

        for section in &model.sections {
            let mut out = self.build_slide(model, section.index, &section.html, slide, &mut deck, &mut media, diagnostics);
            out.background = background;
            out.notes = section.notes.clone();
            out.classes = section.classes.clone();
            deck.slides.push(out);
        }

        if deck.slides.is_empty() {
            let mut blank = Slide::new(1);
            blank.background = background;
            deck.slides.push(blank);
        }

        deck
    }

    #[allow(clippy::too_many_arguments)]
    fn build_slide(
        &self,
        model: &DocumentModel,
        index: usize,
        html: &str,
        slide: (f64, f64),
        deck: &mut Deck,
        media: &mut MediaLoader,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Slide {
        let mut out = Slide::new(index);
        let mut items = read_items(html);

        let title = match items.iter().position(Item::is_flow) {
            Some(first) if matches!(items[first], Item::Heading { level, .. } if level <= 2) => {
                match items.remove(first) {
                    Item::Heading { level, runs } => Some((level, runs)),
                    _ => None,
                }
            }
            _ => None,
        };

        let furniture = model.furniture_for(index);
        let header = furniture.map(|f| f.header.as_slice()).unwrap_or_default();
        let footer = furniture.map(|f| f.footer.as_slice()).unwrap_or_default();
        let regions = SlideRegions::new(slide, !header.is_empty(), title.is_some(), !footer.is_empty());

        let (layered, flow): (Vec<Item>, Vec<Item>) = items.into_iter().partition(|i| !i.is_flow());
        let mut layered: Vec<ImageItem> = layered
            .into_iter()
            .filter_map(|item| match item {
                Item::Image(img) => Some(img),
                _ => None,
            })
            .collect();
        layered.sort_by_key(|img| img.z_index);

        let (below, above): (Vec<&ImageItem>, Vec<&ImageItem>) =
            layered.iter().partition(|img| img.z_index <= 1);

        for img in below {
            self.push_layered(img, slide, deck, media, &mut out, diagnostics);
        }

        if let Some((level, runs)) = title {
            out.title = Some(plain_text(&runs));
            out.shapes.push(Shape::Text(TextBox {
                frame: regions.title.to_frame(),
                paragraphs: vec![Paragraph::Heading { level, runs }],
                align: ItemAlign::Left,
                font_size: self.settings.font_size,
            }));
        }

        self.push_flow(flow, slide, regions.body, deck, media, &mut out, diagnostics);

        for img in above {
            self.push_layered(img, slide, deck, media, &mut out, diagnostics);
        }

        self.push_running(header, regions.header, &mut out);
        self.push_running(footer, regions.footer, &mut out);

        if self.settings.show_slide_number && model.is_paginated() {
            out.shapes.push(Shape::Text(TextBox {
                frame: regions.number.to_frame(),
                paragraphs: vec![Paragraph::Text(vec![TextRun::plain(index.to_string())])],
                align: ItemAlign::Right,
                font_size: NUMBER_FONT_PT,
            }));
        }

        out
    }

    fn push_layered(
        &self,
        img: &ImageItem,
        slide: (f64, f64),
        deck: &mut Deck,
        media: &mut MediaLoader,
        out: &mut Slide,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let Some((index, intrinsic)) = media.load(&img.src, deck, Some(out.number), diagnostics)
        else {
            return;
        };
        let rect = place_image(&img.placement, slide, intrinsic);
        out.shapes.push(Shape::Picture(PictureShape {
            frame: rect.to_frame(),
            media: index,
            description: img.alt.clone(),
        }));
    }

    #[allow(clippy::too_many_arguments)]
    fn push_flow(
        &self,
        flow: Vec<Item>,
        slide: (f64, f64),
        body: Rect,
        deck: &mut Deck,
        media: &mut MediaLoader,
        out: &mut Slide,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let base = self.settings.font_size;
        let mut cursor = FlowCursor::new(body);
        let mut pending: Vec<Paragraph> = Vec::new();

        for item in flow {
            match item {
                Item::Heading { level, runs } => pending.push(Paragraph::Heading {
                    level: level.min(4),
                    runs,
                }),
                Item::Paragraph(runs) => pending.push(Paragraph::Text(runs)),
                Item::List(entries) => pending.extend(entries.into_iter().map(|e| {
                    Paragraph::Bullet {
                        level: e.level,
                        ordered: e.ordered,
                        runs: e.runs,
                    }
                })),
                Item::Quote(paragraphs) => pending.extend(paragraphs.into_iter().map(|runs| {
                    Paragraph::Text(
                        runs.into_iter()
                            .map(|mut r| {
                                r.italic = true;
                                r
                            })
                            .collect(),
                    )
                })),
                Item::Code(text) => {
                    pending.extend(text.lines().map(|line| Paragraph::Code(line.to_string())))
                }
                Item::Table { header, rows } => {
                    flush_text(&mut pending, &mut cursor, out, base);
                    let count = rows.len() + usize::from(!header.is_empty());
                    let frame = cursor.take(count.max(1) as f64 * ROW_IN).to_frame();
                    out.shapes.push(Shape::Table(TableShape {
                        frame,
                        header,
                        rows,
                    }));
                }
                Item::Image(img) => {
                    flush_text(&mut pending, &mut cursor, out, base);
                    let Some((index, intrinsic)) =
                        media.load(&img.src, deck, Some(out.number), diagnostics)
                    else {
                        continue;
                    };
                    let placement = match img.kind {
                        ImageKind::Sized => img.placement.clone(),
                        _ => Default::default(),
                    };
                    let rect = flow_image(&placement, slide, cursor.remaining(), intrinsic);
                    cursor.advance(rect.h);
                    out.shapes.push(Shape::Picture(PictureShape {
                        frame: rect.to_frame(),
                        media: index,
                        description: img.alt,
                    }));
                }
            }
        }
        flush_text(&mut pending, &mut cursor, out, base);
    }

    fn push_running(&self, items: &[RunningItem], band: Rect, out: &mut Slide) {
        for item in items {
            out.shapes.push(Shape::Text(TextBox {
                frame: band.to_frame(),
                paragraphs: vec![Paragraph::Text(inline_runs(&item.html))],
                align: item.align,
                font_size: RUNNING_FONT_PT,
            }));
        }
    }
}

/// Emit the pending paragraphs as one text box at the cursor
fn flush_text(pending: &mut Vec<Paragraph>, cursor: &mut FlowCursor, out: &mut Slide, base: u32) {
    if pending.is_empty() {
        return;
    }
    let paragraphs = std::mem::take(pending);
    let height = text_height(&paragraphs, cursor.remaining().w, base);
    out.shapes.push(Shape::Text(TextBox {
        frame: cursor.take(height).to_frame(),
        paragraphs,
        align: ItemAlign::Left,
        font_size: base,
    }));
}

/// Loads image bytes once per source and registers them with the deck
struct MediaLoader<'m> {
    model: &'m DocumentModel,
    resolver: AssetResolver,
    loaded: HashMap<String, Option<(usize, Option<(u32, u32)>)>>,
}

impl<'m> MediaLoader<'m> {
    fn new(model: &'m DocumentModel) -> Self {
        Self {
            model,
            resolver: model.asset_resolver(),
            loaded: HashMap::new(),
        }
    }

    /// Media index and pixel size of `src`, or `None` when it cannot be read
    fn load(
        &mut self,
        src: &str,
        deck: &mut Deck,
        section: Option<usize>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<(usize, Option<(u32, u32)>)> {
        if let Some(done) = self.loaded.get(src) {
            return *done;
        }

        let result = match self.resolver.read(src) {
            Ok(bytes) => match media_type(src, &bytes) {
                Some((content_type, extension)) => {
                    let intrinsic = image::load_from_memory(&bytes)
                        .ok()
                        .map(|img| (img.width(), img.height()));
                    Some((deck.add_media(bytes, &content_type, &extension), intrinsic))
                }
                None => {
                    warn!(src = short(src), "unsupported image type, skipping picture");
                    self.report(src, "unsupported image type", section, diagnostics);
                    None
                }
            },
            Err(err) => {
                warn!(src = short(src), error = %err, "image unreadable, skipping picture");
                self.report(src, &err.to_string(), section, diagnostics);
                None
            }
        };

        self.loaded.insert(src.to_string(), result);
        result
    }

    /// Record a W004 unless parsing already reported the same asset
    fn report(
        &self,
        src: &str,
        reason: &str,
        section: Option<usize>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let target = short(src);
        let known = self
            .model
            .diagnostics
            .iter()
            .chain(diagnostics.iter())
            .any(|d| d.has_code(codes::ASSET_NOT_FOUND) && d.target.as_deref() == Some(target));
        if known {
            return;
        }

        let mut diag = Diagnostic::warning(format!("image not embedded in slide: {target} ({reason})"))
            .with_code(codes::ASSET_NOT_FOUND)
            .with_target(target);
        if let Some(section) = section {
            diag = diag.with_section(section);
        }
        diagnostics.push(diag);
    }
}

/// Content type and file extension of image bytes
fn media_type(src: &str, bytes: &[u8]) -> Option<(String, String)> {
    if let Ok(format) = image::guess_format(bytes) {
        let extension = format.extensions_str().first().copied().unwrap_or("bin");
        return Some((format.to_mime_type().to_string(), extension.to_string()));
    }

    let mime = data_uri_mime(src)
        .map(str::to_string)
        .unwrap_or_else(|| mime_for(src));
    let extension = match mime.as_str() {
        "image/svg+xml" => "svg",
        "image/png" => "png",
        "image/jpeg" => "jpeg",
        "image/gif" => "gif",
        _ => return None,
    };
    Some((mime, extension.to_string()))
}

/// Data URIs are reported by their header only
fn short(src: &str) -> &str {
    if src.starts_with("data:") {
        src.split(',').next().unwrap_or(src)
    } else {
        src
    }
}

#[cfg(test)]
mod tests {
    use aksara_ast::{ConvertOptions, OutputFormat};
    use chrono::{FixedOffset, TimeZone};

    use super::*;

    fn model(text: &str, options: ConvertOptions) -> DocumentModel {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
            .unwrap();
        aksara_core::parse_at(text, &options, now)
    }

    fn deck(text: &str) -> (Deck, Vec<Diagnostic>) {
        let m = model(text, ConvertOptions::new(OutputFormat::Pptx));
        let mut diags = Vec::new();
        let deck = PptxRenderer::new(PptxSettings::default()).build_deck(&m, &mut diags);
        (deck, diags)
    }

    fn texts(slide: &Slide) -> Vec<String> {
        slide
            .shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Text(text) => Some(
                    text.paragraphs
                        .iter()
                        .map(|p| match p {
                            Paragraph::Heading { runs, .. }
                            | Paragraph::Text(runs)
                            | Paragraph::Bullet { runs, .. } => plain_text(runs),
                            Paragraph::Code(line) => line.clone(),
                        })
                        .collect::<Vec<_>>()
                        .join("|"),
                ),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_one_slide_per_section_with_title() {
        let (deck, diags) = deck(
            "<!--\naksara:true\ntype: presentation\nfooter: Acme | [page]/[total]\n-->\n# Welcome\nHello\n---\n## Agenda\n- one\n- two",
        );
        assert!(diags.is_empty());
        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.slides[0].title.as_deref(), Some("Welcome"));
        assert_eq!(deck.slides[1].title.as_deref(), Some("Agenda"));

        let second = texts(&deck.slides[1]);
        assert!(second.contains(&"one|two".to_string()));
        assert!(second.contains(&"Acme".to_string()));
        assert!(second.contains(&"2/2".to_string()));
        assert!(second.contains(&"2".to_string()));
    }

    #[test]
    fn test_slide_size_from_ratio() {
        let (deck, _) = deck("<!--\naksara:true\nsize: 16:9\n-->\nx");
        assert_eq!(deck.size, (9_144_000, 5_143_500));
    }

    #[test]
    fn test_table_becomes_table_shape() {
        let (deck, _) = deck("<!--\naksara:true\n-->\n| a | b |\n|---|---|\n| 1 | 2 |");
        let table = deck.slides[0]
            .shapes
            .iter()
            .find_map(|s| match s {
                Shape::Table(t) => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(table.header, vec!["a", "b"]);
        assert_eq!(table.rows, vec![vec!["1".to_string(), "2".to_string()]]);
    }

    #[test]
    fn test_missing_image_skipped_once() {
        let dir = tempfile::tempdir().unwrap();
        let options = ConvertOptions::new(OutputFormat::Pptx).with_base_path(dir.path());
        let m = model("<!--\naksara:true\n-->\n![wm t:0 l:0 w:10%](gone.png)", options);
        assert_eq!(m.diagnostics.len(), 1);

        let mut diags = Vec::new();
        let deck = PptxRenderer::new(PptxSettings::default()).build_deck(&m, &mut diags);
        assert!(diags.is_empty());
        assert_eq!(deck.slides[0].pictures().count(), 0);
        assert!(deck.media.is_empty());
    }

    #[test]
    fn test_sized_watermark_flows_at_its_width() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbImage::new(40, 20)
            .save(dir.path().join("logo.png"))
            .unwrap();
        let options = ConvertOptions::new(OutputFormat::Pptx).with_base_path(dir.path());
        let m = model("<!--\naksara:true\n-->\n![wm w:20%](logo.png)", options);

        let mut diags = Vec::new();
        let deck = PptxRenderer::new(PptxSettings::default()).build_deck(&m, &mut diags);
        assert!(diags.is_empty());

        let picture = deck.slides[0].pictures().next().unwrap();
        assert_eq!(picture.frame.cx, 1_828_800);
        assert_eq!(picture.frame.cy, 914_400);
        assert!(picture.frame.x > 0);
    }

    #[test]
    fn test_pass_through_has_no_number_label() {
        let (deck, _) = deck("Just text\n\n---\n\nmore");
        assert_eq!(deck.slides.len(), 1);
        assert!(!texts(&deck.slides[0]).contains(&"1".to_string()));
    }

    #[test]
    fn test_empty_document_gets_blank_slide() {
        let (deck, _) = deck("");
        assert_eq!(deck.slides.len(), 1);
        assert!(deck.slides[0].shapes.is_empty());
    }

    #[test]
    fn test_short_data_uri() {
        assert_eq!(short("data:image/png;base64,AAAA"), "data:image/png;base64");
        assert_eq!(short("a.png"), "a.png");
    }
}
