//! End-to-end tests for the parse pipeline
//!
//! Each test feeds a complete annotated document through `parse_at` and
//! checks the assembled model.

use aksara_ast::{ConvertOptions, DocumentKind, OutputFormat};
use aksara_core::diagnostics::codes;
use aksara_core::{parse, parse_at, DocumentModel};
use chrono::{DateTime, FixedOffset, TimeZone};

fn fixed_now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(7 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 8, 17, 9, 0, 0)
        .unwrap()
}

fn html_model(text: &str) -> DocumentModel {
    parse_at(text, &ConvertOptions::new(OutputFormat::Html), fixed_now())
}

const REPORT: &str = r#"<!--
aksara:true
type: document
size: 210mmx297mm
meta:
    title: "Annual Report"
    company: Acme
    ref: AR-2024
header: ${meta.company} | Confidential | ${new Date().getFullYear()}
footer: Ref: ${meta.ref} | Page [page] of [total]
-->
# ${meta.title}

Prepared by **${meta.company}** on ${new Date().toLocaleDateString('id-ID')}.

---

<!-- class: chapter -->
## Figures

| Quarter | Revenue |
|---------|--------:|
| Q1      | ${10 * 12} |

![wm t:0 l:0 w:10%](logo.png)

---

## Appendix

```mermaid
graph TD; A-->B
```
"#;

#[test]
fn test_report_sections_and_indices() {
    let model = html_model(REPORT);

    assert!(model.directives.enabled);
    assert_eq!(model.directives.kind, DocumentKind::Document);
    assert_eq!(model.total_pages(), 3);
    let indices: Vec<usize> = model.sections.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[test]
fn test_report_expressions_resolved_before_markup() {
    let model = html_model(REPORT);
    let first = &model.sections[0].html;

    assert!(first.contains("<h1>Annual Report</h1>"));
    assert!(first.contains("<strong>Acme</strong>"));
    assert!(first.contains("17/8/2024"));
    assert!(model.sections[1].html.contains("<td style=\"text-align:right\">120</td>"));
}

#[test]
fn test_report_header_and_footer() {
    let model = html_model(REPORT);
    let second = model.furniture_for(2).unwrap();

    let header: Vec<&str> = second.header.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(header, vec!["Acme", "Confidential", "2024"]);

    let footer: Vec<&str> = second.footer.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(footer, vec!["Ref: AR-2024", "Page 2 of 3"]);
}

#[test]
fn test_report_class_image_and_diagram() {
    let model = html_model(REPORT);

    assert_eq!(model.sections[1].classes.as_deref(), Some("chapter"));
    assert!(model.sections[1].html.contains("aksara-layer-wm"));
    assert!(model.sections[1].html.contains("z-index:0;"));
    assert!(model.sections[2].html.contains("<div class=\"mermaid\">\ngraph TD; A-->B\n</div>"));
    assert!(model.has_diagrams());
}

#[test]
fn test_report_geometry_shared_by_css_and_print() {
    let model = html_model(REPORT);
    assert_eq!(model.geometry.css_size(), model.geometry.print_size());
    assert_eq!(model.geometry.print_size().0, "210mm");
}

#[test]
fn test_report_is_clean() {
    let model = html_model(REPORT);
    assert!(model.diagnostics.is_empty(), "{:?}", model.diagnostics);
}

#[test]
fn test_idempotent_html() {
    let a = html_model(REPORT);
    let b = html_model(REPORT);
    assert_eq!(a.sections, b.sections);
    assert_eq!(a.furniture, b.furniture);
}

#[test]
fn test_no_directive_block_is_one_section() {
    let text = "# Notes\n\n---\n\n- a\n- b\n\n---\n\nEnd";
    let model = parse(text, &ConvertOptions::default());

    assert!(!model.directives.enabled);
    assert_eq!(model.total_pages(), 1);
    assert_eq!(model.sections[0].html.matches("<hr />").count(), 2);
}

#[test]
fn test_unterminated_directive_block() {
    let text = "<!--\naksara:true\nsize: 16:9\n\n# Title\n---\nmore";
    let model = html_model(text);

    assert!(!model.directives.enabled);
    assert_eq!(model.total_pages(), 1);
    assert!(model
        .diagnostics
        .iter()
        .any(|d| d.has_code(codes::DIRECTIVE_BLOCK)));
}

#[test]
fn test_presentation_default_geometry() {
    let model = html_model("<!--\naksara:true\ntype: presentation\n-->\n# Slide");
    assert_eq!(
        model.geometry.css_size(),
        ("1920px".to_string(), "1080px".to_string())
    );
    assert_eq!(model.furniture[0].footer[0].text, "Page 1 of 1");
}

#[test]
fn test_bad_size_degrades() {
    let model = html_model("<!--\naksara:true\nsize: A4-ish\n-->\n# Page");
    assert!(model.diagnostics.iter().any(|d| d.has_code(codes::PAGE_SIZE)));
    assert_eq!(model.geometry.print_size().1, "297mm");
}

#[test]
fn test_embedding_missing_asset_warns_with_section() {
    let dir = tempfile::tempdir().unwrap();
    let options = ConvertOptions::new(OutputFormat::Pdf).with_base_path(dir.path());
    let text = "<!--\naksara:true\n-->\nIntro\n---\n![bg](missing.jpg)";
    let model = parse_at(text, &options, fixed_now());

    let diag = model
        .diagnostics
        .iter()
        .find(|d| d.has_code(codes::ASSET_NOT_FOUND))
        .expect("asset warning");
    assert_eq!(diag.section, Some(2));
    assert!(model.sections[1].html.contains("url('missing.jpg')"));
}

#[test]
fn test_embedding_inlines_local_image() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("dot.gif"), b"GIF89a").unwrap();
    let options = ConvertOptions::new(OutputFormat::Pptx).with_base_path(dir.path());
    let model = parse_at("![lg t:2 r:2 w:8](dot.gif)", &options, fixed_now());

    assert!(model.sections[0].html.contains("src=\"data:image/gif;base64,"));
    assert!(model.diagnostics.is_empty());
}
