//! Markup engine
//!
//! Section text goes through three stages:
//!
//! 1. `${...}` substitution (fenced code is left alone)
//! 2. tokenizing into a [`Block`] tree
//! 3. rendering the tree to HTML
//!
//! Substitution runs first so computed values take part in the markdown
//! rules, e.g. a date inside a heading.

pub mod html;
pub mod image;
pub mod inline;
pub mod parser;

use aksara_ast::Block;

pub use html::{escape_html, HtmlWriter};
pub use image::parse_image;
pub use inline::parse_inlines;
pub use parser::parse_blocks;

use crate::assets::AssetResolver;
use crate::diagnostics::Diagnostic;
use crate::expr::ExpressionEvaluator;
use crate::sections::fence_marker;

/// Transforms section text into HTML fragments
pub struct MarkupEngine<'a> {
    evaluator: ExpressionEvaluator<'a>,
    assets: &'a AssetResolver,
}

impl<'a> MarkupEngine<'a> {
    pub fn new(evaluator: ExpressionEvaluator<'a>, assets: &'a AssetResolver) -> Self {
        Self { evaluator, assets }
    }

    /// Substitute expressions outside fenced code
    pub fn substitute(&self, text: &str, diagnostics: &mut Vec<Diagnostic>) -> String {
        let mut out = Vec::new();
        let mut fence: Option<char> = None;

        for line in text.lines() {
            if let Some(marker) = fence_marker(line.trim_start()) {
                fence = match fence {
                    None => Some(marker),
                    Some(open) if open == marker => None,
                    other => other,
                };
                out.push(line.to_string());
            } else if fence.is_some() {
                out.push(line.to_string());
            } else {
                out.push(self.evaluator.substitute(line, diagnostics));
            }
        }
        out.join("\n")
    }

    /// Block tree for section text, after substitution
    pub fn blocks(&self, text: &str, diagnostics: &mut Vec<Diagnostic>) -> Vec<Block> {
        parse_blocks(&self.substitute(text, diagnostics))
    }

    /// HTML for a whole section
    pub fn render(&self, text: &str, diagnostics: &mut Vec<Diagnostic>) -> String {
        let blocks = self.blocks(text, diagnostics);
        HtmlWriter::new(self.assets, diagnostics).blocks(&blocks)
    }

    /// HTML for a single line of inline content, e.g. a header item
    pub fn render_inline(&self, text: &str, diagnostics: &mut Vec<Diagnostic>) -> String {
        let text = self.evaluator.substitute(text, diagnostics);
        let inlines = parse_inlines(&text);
        HtmlWriter::new(self.assets, diagnostics).inlines(&inlines)
    }

    /// Plain text and inline HTML for one header or footer item
    pub fn render_running(&self, text: &str, diagnostics: &mut Vec<Diagnostic>) -> (String, String) {
        let text = self.evaluator.substitute(text, diagnostics);
        let inlines = parse_inlines(&text);
        let plain = inlines.iter().map(|inline| inline.plain_text()).collect();
        let html = HtmlWriter::new(self.assets, diagnostics).inlines(&inlines);
        (plain, html)
    }
}
