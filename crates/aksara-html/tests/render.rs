//! HTML page output tests

use aksara_ast::{ConvertOptions, OutputFormat};
use aksara_core::diagnostics::codes;
use aksara_core::{parse_at, DocumentModel};
use aksara_html::{render_html, HtmlRenderer, Theme};
use chrono::{DateTime, FixedOffset, TimeZone};

fn now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2025, 3, 4, 10, 0, 0)
        .unwrap()
}

fn model_with(text: &str, options: ConvertOptions) -> DocumentModel {
    parse_at(text, &options, now())
}

fn model(text: &str) -> DocumentModel {
    model_with(text, ConvertOptions::new(OutputFormat::Html))
}

const DECK: &str = "<!--
aksara:true
type: presentation
size: 16:9
meta:
    title: Quarterly Review
    author: Rina
header: Acme | Q1
footer: Confidential | [page] / [total]
-->
# Quarterly Review

![bg](cover.jpg)

---

<!-- class: split dark -->
## Numbers

- Revenue up
  - mostly services
- Costs flat

<!-- notes: mention the hiring plan -->
";

#[test]
fn test_one_section_per_page() {
    let out = render_html(&model(DECK));
    assert!(out.html.starts_with("<!DOCTYPE html>\n<html lang=\"en-US\">"));
    assert!(out.html.contains("<section class=\"aksara-page\" id=\"page-1\" data-page=\"1\">"));
    assert!(out.html.contains("<section class=\"aksara-page split dark\" id=\"page-2\" data-page=\"2\">"));
    assert!(out.html.contains("<body class=\"aksara aksara-presentation aksara-theme-default\">"));
}

#[test]
fn test_page_size_variables() {
    let out = render_html(&model(DECK));
    assert!(out.html.contains(":root{--page-width:1920px;--page-height:1080px;}"));
}

#[test]
fn test_head_metadata() {
    let out = render_html(&model(DECK));
    assert!(out.html.contains("<title>Quarterly Review</title>"));
    assert!(out.html.contains("<meta name=\"author\" content=\"Rina\" />"));
}

#[test]
fn test_running_items_per_page() {
    let out = render_html(&model(DECK));
    assert!(out.html.contains(
        "<header class=\"aksara-header\"><div class=\"aksara-item aksara-align-left\">Acme</div><div class=\"aksara-item aksara-align-right\">Q1</div></header>"
    ));
    assert!(out.html.contains("<div class=\"aksara-item aksara-align-right\">2 / 2</div></footer>"));
}

#[test]
fn test_background_hoisted_into_backdrop() {
    let out = render_html(&model(DECK));
    let page = &out.html[out.html.find("id=\"page-1\"").unwrap()..];
    let backdrop = page.find("<div class=\"aksara-backdrop\">").unwrap();
    let content = page.find("<div class=\"aksara-content\">").unwrap();
    let layer = page.find("aksara-layer-bg").unwrap();
    assert!(backdrop < layer && layer < content);
}

#[test]
fn test_notes_hidden_aside() {
    let out = render_html(&model(DECK));
    assert!(out.html.contains("<aside class=\"notes\">mention the hiring plan</aside>"));
    assert!(!out.html.contains("notes:"));
}

#[test]
fn test_navigation_only_when_paginated() {
    let deck = render_html(&model(DECK));
    assert!(deck.html.contains("<nav class=\"aksara-controls\""));
    assert!(deck.html.contains("addEventListener('keydown'"));

    let plain = render_html(&model("# Plain\n\nText\n\n---\n\nMore"));
    assert!(plain.html.contains("<main class=\"aksara-flow\">"));
    assert!(!plain.html.contains("aksara-controls\""));
    assert!(!plain.html.contains("<section"));
    assert!(plain.html.contains("<hr />"));
}

#[test]
fn test_diagram_script_only_with_diagrams() {
    let without = render_html(&model(DECK));
    assert!(!without.html.contains("mermaid.min.js"));

    let with = render_html(&model("<!--\naksara:true\n-->\n```mermaid\ngraph LR; a-->b\n```"));
    assert!(with.html.contains("mermaid.min.js"));
    assert!(with.html.contains("<div class=\"mermaid\">"));
}

#[test]
fn test_document_background_on_every_page() {
    let out = render_html(&model("<!--\naksara:true\nbackground: paper.png\n-->\nA\n---\nB\n---\nC"));
    assert_eq!(out.html.matches("url('paper.png')").count(), 3);
}

#[test]
fn test_user_stylesheet_inlined() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("brand.css"), ".aksara-page{background:#fafafa;}\n").unwrap();
    let options = ConvertOptions::new(OutputFormat::Html).with_base_path(dir.path());
    let out = render_html(&model_with("<!--\naksara:true\nstyle: brand.css\n-->\n# X", options));

    assert!(out.html.contains(".aksara-page{background:#fafafa;}"));
    assert!(out.diagnostics.is_empty());
}

#[test]
fn test_missing_stylesheet_degrades() {
    let dir = tempfile::tempdir().unwrap();
    let options = ConvertOptions::new(OutputFormat::Html).with_base_path(dir.path());
    let out = render_html(&model_with("<!--\naksara:true\nstyle: gone.css\n-->\n# X", options));

    assert!(out.html.contains("<h1>X</h1>"));
    assert!(out.diagnostics.iter().any(|d| d.has_code(codes::STYLE)));
}

#[test]
fn test_theme_selection() {
    let options = ConvertOptions::new(OutputFormat::Html).with_theme("dark");
    let m = model_with(DECK, options);
    assert_eq!(HtmlRenderer::new(&m).theme(), Theme::Dark);
    assert!(render_html(&m).html.contains("aksara-theme-dark"));

    let options = ConvertOptions::new(OutputFormat::Html).with_theme("sparkly");
    let out = render_html(&model_with(DECK, options));
    assert!(out.html.contains("aksara-theme-default"));
    assert!(out.diagnostics[0].has_code(codes::STYLE));
}

#[test]
fn test_output_is_deterministic() {
    assert_eq!(render_html(&model(DECK)).html, render_html(&model(DECK)).html);
}
