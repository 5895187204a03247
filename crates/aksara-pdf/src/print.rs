//! Print layout
//!
//! The same pages as the HTML output, stacked without navigation, one page
//! break per section and `@page` sized from the resolved geometry. Every
//! asset reference is inlined so the browser needs no file access.

use aksara_core::assets::{embed_html_assets, AssetResolver};
use aksara_core::{Diagnostic, DocumentModel};
use aksara_html::HtmlRenderer;

/// Build the print document for `model`
pub fn print_document(model: &DocumentModel, diagnostics: &mut Vec<Diagnostic>) -> String {
    let mut renderer = HtmlRenderer::new(model);
    let css = renderer.stylesheet();
    let (width, height) = model.geometry.print_size();
    let lang = aksara_core::markup::escape_html(&model.options.locale);

    let mut html = format!("<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n");
    html.push_str(&renderer.head_meta());
    html.push_str("<style>\n");
    html.push_str(&css);
    html.push('\n');
    if model.is_paginated() {
        html.push_str(&format!("@page{{size:{width} {height};margin:0;}}\n"));
        html.push_str(PAGED_CSS);
    } else {
        html.push_str(&format!("@page{{size:{width} {height};margin:18mm 16mm;}}\n"));
        html.push_str(FLOW_CSS);
    }
    html.push_str("\n</style>\n</head>\n");

    if model.is_paginated() {
        html.push_str("<body class=\"aksara aksara-print\">\n<main class=\"aksara-deck\">\n");
        for section in &model.sections {
            html.push_str(&renderer.page(section));
            html.push('\n');
        }
    } else {
        html.push_str("<body class=\"aksara aksara-print\">\n<main class=\"aksara-flow\">\n");
        for section in &model.sections {
            html.push_str(&section.html);
            html.push('\n');
        }
    }
    html.push_str("</main>\n");
    html.push_str(&renderer.diagram_scripts());
    html.push_str("</body>\n</html>\n");

    diagnostics.extend(renderer.into_diagnostics());

    let resolver = AssetResolver::new(model.options.base_path.clone(), true);
    let mut embedding = Vec::new();
    let html = embed_html_assets(&html, &resolver, &mut embedding);
    diagnostics.extend(
        embedding
            .into_iter()
            .filter(|d| !already_reported(model, d)),
    );
    html
}

fn already_reported(model: &DocumentModel, diag: &Diagnostic) -> bool {
    model
        .diagnostics
        .iter()
        .any(|d| d.code == diag.code && d.target == diag.target)
}

const PAGED_CSS: &str = r#"html,body{background:none;}
body{-webkit-print-color-adjust:exact;print-color-adjust:exact;}
.aksara-deck{display:block;padding:0;gap:0;}
.aksara-page{margin:0;box-shadow:none;border:none;break-after:page;page-break-after:always;}
.aksara-page:last-child{break-after:auto;page-break-after:auto;}"#;

const FLOW_CSS: &str = r#"html,body{background:none;}
.aksara-flow{max-width:none;padding:0;}
pre,table,img{break-inside:avoid;}"#;

#[cfg(test)]
mod tests {
    use aksara_ast::{ConvertOptions, OutputFormat};
    use chrono::{FixedOffset, TimeZone};

    use super::*;

    fn model(text: &str, options: ConvertOptions) -> DocumentModel {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .unwrap();
        aksara_core::parse_at(text, &options, now)
    }

    #[test]
    fn test_page_size_and_breaks() {
        let m = model(
            "<!--\naksara:true\nsize: 210mmx297mm\n-->\nOne\n---\nTwo",
            ConvertOptions::new(OutputFormat::Pdf),
        );
        let mut diags = Vec::new();
        let html = print_document(&m, &mut diags);

        assert!(html.contains("@page{size:210mm 297mm;margin:0;}"));
        assert!(html.contains("page-break-after:always"));
        assert_eq!(html.matches("<section class=\"aksara-page\"").count(), 2);
        assert!(!html.contains("aksara-controls"));
        assert!(!html.contains("keydown"));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_ratio_size_in_centimetres() {
        let m = model("<!--\naksara:true\nsize: 16:9\n-->\nSlide", ConvertOptions::new(OutputFormat::Pdf));
        let html = print_document(&m, &mut Vec::new());
        let (w, h) = m.geometry.print_size();
        assert_eq!(w, "29.7cm");
        assert!(html.contains(&format!("@page{{size:{w} {h};margin:0;}}")));
    }

    #[test]
    fn test_stylesheet_urls_embedded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("brand.css"), ".x{background:url(dot.gif);}").unwrap();
        std::fs::write(dir.path().join("dot.gif"), b"GIF89a").unwrap();
        let options = ConvertOptions::new(OutputFormat::Pdf).with_base_path(dir.path());
        let m = model("<!--\naksara:true\nstyle: brand.css\n-->\nBody", options);

        let mut diags = Vec::new();
        let html = print_document(&m, &mut diags);
        assert!(html.contains(".x{background:url('data:image/gif;base64,"));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_missing_asset_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let options = ConvertOptions::new(OutputFormat::Pdf).with_base_path(dir.path());
        let m = model("<!--\naksara:true\n-->\n![bg](missing.png)", options);
        assert_eq!(m.diagnostics.len(), 1);

        let mut diags = Vec::new();
        print_document(&m, &mut diags);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_pass_through_flows() {
        let m = model("# Notes\n\n---\n\nText", ConvertOptions::new(OutputFormat::Pdf));
        let html = print_document(&m, &mut Vec::new());
        assert!(html.contains("<main class=\"aksara-flow\">"));
        assert!(html.contains("@page{size:210mm 297mm;margin:18mm 16mm;}"));
    }
}
