//! End-to-end deck rendering tests

use std::io::{Cursor, Read};
use std::path::Path;

use aksara_ast::{ConvertOptions, OutputFormat};
use aksara_core::settings::PptxSettings;
use aksara_core::DocumentModel;
use aksara_pptx::{render_pptx, RenderedPptx};
use chrono::{FixedOffset, TimeZone};
use zip::ZipArchive;

fn model_in(dir: Option<&Path>, text: &str) -> DocumentModel {
    let now = FixedOffset::east_opt(7 * 3600)
        .unwrap()
        .with_ymd_and_hms(2025, 6, 2, 10, 30, 0)
        .unwrap();
    let mut options = ConvertOptions::new(OutputFormat::Pptx);
    if let Some(dir) = dir {
        options = options.with_base_path(dir);
    }
    aksara_core::parse_at(text, &options, now)
}

fn render(model: &DocumentModel) -> RenderedPptx {
    render_pptx(model, &PptxSettings::default()).unwrap()
}

fn part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}

fn names(bytes: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    archive.file_names().map(str::to_string).collect()
}

fn fixture_png(dir: &Path, name: &str) {
    image::RgbImage::new(40, 20).save(dir.join(name)).unwrap();
}

const DECK: &str = "<!--
aksara:true
type: presentation
header: ${meta.company} | Quarterly review
footer: Confidential | [page] of [total]
meta:
    company: Acme
-->
<!-- notes: Open with the numbers -->
# Results
Revenue is **up**.

---

## Plan
1. Hire
2. Ship

---

| Item | Logo |
|------|------|
| One | ![x](logo.png) |
";

#[test]
fn test_one_slide_per_section() {
    let dir = tempfile::tempdir().unwrap();
    fixture_png(dir.path(), "logo.png");
    let rendered = render(&model_in(Some(dir.path()), DECK));
    let files = names(&rendered.bytes);

    assert!(files.contains(&"ppt/slides/slide1.xml".to_string()));
    assert!(files.contains(&"ppt/slides/slide3.xml".to_string()));
    assert!(!files.contains(&"ppt/slides/slide4.xml".to_string()));

    let presentation = part(&rendered.bytes, "ppt/presentation.xml");
    assert_eq!(presentation.matches("<p:sldId ").count(), 3);
    assert!(presentation.contains(r#"<p:sldSz cx="9144000" cy="5143500""#));
}

#[test]
fn test_title_and_furniture_text() {
    let dir = tempfile::tempdir().unwrap();
    fixture_png(dir.path(), "logo.png");
    let rendered = render(&model_in(Some(dir.path()), DECK));

    let first = part(&rendered.bytes, "ppt/slides/slide1.xml");
    assert!(first.contains(">Results</a:t>"));
    assert!(first.contains(">Acme</a:t>"));
    assert!(first.contains(">Quarterly review</a:t>"));
    assert!(first.contains(">Confidential</a:t>"));
    assert!(first.contains(">1 of 3</a:t>"));
    assert!(first.contains(r#"b="1""#));

    let second = part(&rendered.bytes, "ppt/slides/slide2.xml");
    assert!(second.contains(">Plan</a:t>"));
    assert!(second.contains("buAutoNum"));
    assert!(second.contains(">2 of 3</a:t>"));
}

#[test]
fn test_table_cells_and_notes() {
    let dir = tempfile::tempdir().unwrap();
    fixture_png(dir.path(), "logo.png");
    let rendered = render(&model_in(Some(dir.path()), DECK));

    let third = part(&rendered.bytes, "ppt/slides/slide3.xml");
    assert!(third.contains("<a:tbl>"));
    assert!(third.contains(">Item</a:t>"));
    assert!(third.contains(">[image]</a:t>"));

    let notes = part(&rendered.bytes, "ppt/notesSlides/notesSlide1.xml");
    assert!(notes.contains("Open with the numbers"));
    assert!(!names(&rendered.bytes).contains(&"ppt/notesSlides/notesSlide2.xml".to_string()));
}

#[test]
fn test_metadata_in_core_properties() {
    let text = "<!--\naksara:true\nmeta:\n    title: Board Pack\n    author: Dewi\n-->\nBody";
    let rendered = render(&model_in(None, text));
    let core = part(&rendered.bytes, "docProps/core.xml");
    assert!(core.contains("<dc:title>Board Pack</dc:title>"));
    assert!(core.contains("<dc:creator>Dewi</dc:creator>"));
}

#[test]
fn test_layered_images_order() {
    let dir = tempfile::tempdir().unwrap();
    fixture_png(dir.path(), "mark.png");
    fixture_png(dir.path(), "logo.png");
    let text = "<!--\naksara:true\n-->\n![lg Company logo t:5% r:5% w:10%](logo.png)\n\nBody text\n\n![wm Draft t:0 l:0 w:100%](mark.png)";
    let model = model_in(Some(dir.path()), text);
    let rendered = render(&model);
    assert!(rendered.diagnostics.is_empty());

    let slide = part(&rendered.bytes, "ppt/slides/slide1.xml");
    let watermark = slide.find(r#"descr="Draft""#).unwrap();
    let body = slide.find(">Body text</a:t>").unwrap();
    let logo = slide.find(r#"descr="Company logo""#).unwrap();
    assert!(watermark < body);
    assert!(body < logo);

    // both images are the same bytes and share one media part
    let files = names(&rendered.bytes);
    assert!(files.contains(&"ppt/media/image1.png".to_string()));
    assert!(!files.contains(&"ppt/media/image2.png".to_string()));
}

#[test]
fn test_background_directive() {
    let dir = tempfile::tempdir().unwrap();
    fixture_png(dir.path(), "bg.png");
    let text = "<!--\naksara:true\nbackground: bg.png\n-->\nOne\n\n---\n\nTwo";
    let rendered = render(&model_in(Some(dir.path()), text));

    for n in 1..=2 {
        let slide = part(&rendered.bytes, &format!("ppt/slides/slide{n}.xml"));
        assert!(slide.contains("<p:bg>"));
    }
}

#[test]
fn test_missing_image_warns_and_still_writes() {
    let dir = tempfile::tempdir().unwrap();
    let text = "<!--\naksara:true\n-->\nLook\n\n![chart](gone/chart.png)";
    let model = model_in(Some(dir.path()), text);
    assert!(model
        .diagnostics
        .iter()
        .any(|d| d.code.as_deref() == Some("W004")));

    let rendered = render(&model);
    // already reported while parsing
    assert!(rendered.diagnostics.is_empty());

    let slide = part(&rendered.bytes, "ppt/slides/slide1.xml");
    assert!(slide.contains(">Look</a:t>"));
    assert!(!slide.contains("<p:pic>"));
}

#[test]
fn test_remote_image_reported_by_renderer() {
    let text = "<!--\naksara:true\n-->\n![remote](https://example.com/a.png)";
    let model = model_in(None, text);
    let rendered = render(&model);

    assert_eq!(rendered.diagnostics.len(), 1);
    let diag = &rendered.diagnostics[0];
    assert_eq!(diag.code.as_deref(), Some("W004"));
    assert_eq!(diag.target.as_deref(), Some("https://example.com/a.png"));
    assert_eq!(diag.section, Some(1));
}

#[test]
fn test_slide_number_can_be_hidden() {
    let model = model_in(None, "<!--\naksara:true\nfooter: Acme\n-->\nOnly");
    let settings = PptxSettings {
        show_slide_number: false,
        ..Default::default()
    };
    let rendered = render_pptx(&model, &settings).unwrap();
    let slide = part(&rendered.bytes, "ppt/slides/slide1.xml");
    assert!(slide.contains(">Acme</a:t>"));
    assert!(!slide.contains(">1</a:t>"));
}
