//! Running header and footer
//!
//! A template such as `Ref: ${meta.ref} | Page [page] of [total]` is split on
//! `|`. Each non-empty segment becomes one item: the first is left aligned,
//! the last right aligned and anything between centred. Footer segments get
//! `[page]`/`[total]` replaced before expressions and markup run.

use aksara_ast::Directives;
use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;
use crate::markup::MarkupEngine;

/// Horizontal position of a running item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemAlign {
    Left,
    Center,
    Right,
}

impl ItemAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// One header or footer item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningItem {
    /// Plain text, used by the slide writer
    pub text: String,
    /// Inline HTML, used by the page renderers
    pub html: String,
    pub align: ItemAlign,
}

/// Header and footer items of one page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageFurniture {
    pub header: Vec<RunningItem>,
    pub footer: Vec<RunningItem>,
}

/// Split a template into aligned segments
pub fn split_template(template: &str) -> Vec<(ItemAlign, &str)> {
    let segments: Vec<&str> = template
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let last = segments.len().saturating_sub(1);

    segments
        .into_iter()
        .enumerate()
        .map(|(i, segment)| {
            let align = if i == 0 {
                ItemAlign::Left
            } else if i == last {
                ItemAlign::Right
            } else {
                ItemAlign::Center
            };
            (align, segment)
        })
        .collect()
}

/// Replace `[page]` and `[total]`
pub fn substitute_page_tokens(text: &str, page: usize, total: usize) -> String {
    text.replace("[page]", &page.to_string())
        .replace("[total]", &total.to_string())
}

/// Build the furniture for page `page` of `total`
pub fn build_furniture(
    directives: &Directives,
    page: usize,
    total: usize,
    engine: &MarkupEngine<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> PageFurniture {
    let mut item = |align: ItemAlign, text: &str| {
        let (text, html) = engine.render_running(text, diagnostics);
        RunningItem { text, html, align }
    };

    let header = directives
        .header
        .as_deref()
        .map(|template| {
            split_template(template)
                .into_iter()
                .map(|(align, segment)| item(align, segment))
                .collect()
        })
        .unwrap_or_default();

    let footer = match directives.footer.as_deref() {
        Some(template) => split_template(template)
            .into_iter()
            .map(|(align, segment)| item(align, &substitute_page_tokens(segment, page, total)))
            .collect(),
        None => vec![item(ItemAlign::Right, &format!("Page {page} of {total}"))],
    };

    PageFurniture { header, footer }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::assets::AssetResolver;
    use crate::diagnostics::codes;
    use crate::expr::{EvalContext, ExpressionEvaluator};

    fn furniture(directives: &Directives, page: usize, total: usize) -> (PageFurniture, Vec<Diagnostic>) {
        let assets = AssetResolver::default();
        let engine = MarkupEngine::new(
            ExpressionEvaluator::new(EvalContext::new(&directives.meta, Utc::now().fixed_offset(), "en-US")),
            &assets,
        );
        let mut diags = Vec::new();
        let f = build_furniture(directives, page, total, &engine, &mut diags);
        (f, diags)
    }

    #[test]
    fn test_split_alignment() {
        let parts = split_template("a | b | | c");
        assert_eq!(
            parts,
            vec![(ItemAlign::Left, "a"), (ItemAlign::Center, "b"), (ItemAlign::Right, "c")]
        );
        assert_eq!(split_template("solo"), vec![(ItemAlign::Left, "solo")]);
        assert!(split_template(" | ").is_empty());
    }

    #[test]
    fn test_footer_with_meta_and_tokens() {
        let mut directives = Directives {
            enabled: true,
            footer: Some("Ref: ${meta.ref} | Page [page] of [total]".to_string()),
            ..Default::default()
        };
        directives.meta.insert("ref".to_string(), "QR-7".to_string());

        let (f, diags) = furniture(&directives, 2, 3);
        let texts: Vec<&str> = f.footer.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["Ref: QR-7", "Page 2 of 3"]);
        assert_eq!(f.footer[0].align, ItemAlign::Left);
        assert_eq!(f.footer[1].align, ItemAlign::Right);
        assert!(f.header.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_default_footer() {
        let directives = Directives {
            enabled: true,
            ..Default::default()
        };
        let (f, _) = furniture(&directives, 1, 4);
        assert_eq!(f.footer.len(), 1);
        assert_eq!(f.footer[0].text, "Page 1 of 4");
        assert_eq!(f.footer[0].align, ItemAlign::Right);
    }

    #[test]
    fn test_header_markup_and_missing_meta() {
        let directives = Directives {
            enabled: true,
            header: Some("**${meta.company}** | Draft".to_string()),
            ..Default::default()
        };
        let (f, diags) = furniture(&directives, 1, 1);
        assert_eq!(f.header[0].html, "<strong>[meta.company not found]</strong>");
        assert_eq!(f.header[0].text, "[meta.company not found]");
        assert!(diags.iter().any(|d| d.has_code(codes::META_NOT_FOUND)));
    }
}
