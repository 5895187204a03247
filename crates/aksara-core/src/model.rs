//! Document model assembly
//!
//! [`parse`] is the whole front half of a conversion: directives, sections
//! with rendered HTML, header and footer items per page, and the resolved
//! geometry. The model is read-only for renderers.

use std::collections::BTreeSet;

use aksara_ast::{
    ConvertOptions, Directives, DocumentMetadata, ImageRef, Layer, Section,
};
use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;
use tracing::{debug, info};

use crate::assets::AssetResolver;
use crate::diagnostics::{codes, Diagnostic};
use crate::directive::DirectiveParser;
use crate::error::{CoreError, Result};
use crate::expr::{EvalContext, ExpressionEvaluator};
use crate::geometry::PageGeometry;
use crate::header_footer::{build_furniture, PageFurniture};
use crate::markup::{HtmlWriter, MarkupEngine};
use crate::sections::SectionSplitter;

/// Everything a renderer needs for one conversion
#[derive(Debug, Clone)]
pub struct DocumentModel {
    pub directives: Directives,
    pub metadata: DocumentMetadata,
    /// Sections in document order, indices `1..=N`
    pub sections: Vec<Section>,
    /// Header and footer per section; empty in pass-through mode
    pub furniture: Vec<PageFurniture>,
    /// Full-bleed backdrop from the `background` directive
    pub background_html: Option<String>,
    pub options: ConvertOptions,
    pub geometry: PageGeometry,
    /// Recoverable problems found while parsing
    pub diagnostics: Vec<Diagnostic>,
}

/// Summary used by `aksara inspect`
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary<'a> {
    pub directives: &'a Directives,
    pub metadata: &'a DocumentMetadata,
    pub page_size: (String, String),
    pub sections: Vec<SectionSummary<'a>>,
    pub diagnostics: &'a [Diagnostic],
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionSummary<'a> {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<&'a str>,
    pub has_notes: bool,
    pub html_bytes: usize,
}

/// Parse `text` using the current wall-clock time
pub fn parse(text: &str, options: &ConvertOptions) -> DocumentModel {
    parse_at(text, options, Local::now().fixed_offset())
}

/// Parse `text` with a fixed notion of "now"
pub fn parse_at(text: &str, options: &ConvertOptions, now: DateTime<FixedOffset>) -> DocumentModel {
    let text = text.replace("\r\n", "\n");
    let parsed = DirectiveParser::parse(&text);
    let mut diagnostics = parsed.diagnostics;
    let directives = parsed.directives;

    let mut metadata = parsed.metadata;
    metadata.merge_missing(&options.metadata);

    let mut sections = SectionSplitter::split(&parsed.body, directives.enabled);
    let total = sections.len();

    let geometry = PageGeometry::resolve(
        directives.size.as_deref(),
        options.page_size.as_deref(),
        options.orientation,
        directives.kind,
        &mut diagnostics,
    );

    let assets = AssetResolver::from_options(options);
    let evaluator =
        ExpressionEvaluator::new(EvalContext::new(&directives.meta, now, &options.locale));
    let engine = MarkupEngine::new(evaluator, &assets);

    let mut furniture = Vec::new();
    for section in &mut sections {
        let mut local = Vec::new();
        section.html = engine.render(&section.raw_content, &mut local);
        if directives.enabled {
            furniture.push(build_furniture(
                &directives,
                section.index,
                total,
                &engine,
                &mut local,
            ));
        }
        diagnostics.extend(local.into_iter().map(|d| d.with_section(section.index)));
    }

    let background_html = directives.background.as_deref().map(|src| {
        let backdrop = ImageRef {
            layer: Some(Layer::Background),
            ..ImageRef::plain(src, "")
        };
        HtmlWriter::new(&assets, &mut diagnostics).image(&backdrop)
    });

    info!(
        enabled = directives.enabled,
        kind = directives.kind.as_str(),
        sections = total,
        warnings = diagnostics.len(),
        "parsed document"
    );
    debug!(geometry = %geometry, "resolved page geometry");

    DocumentModel {
        directives,
        metadata,
        sections,
        furniture,
        background_html,
        options: options.clone(),
        geometry,
        diagnostics,
    }
}

impl DocumentModel {
    /// Number of sections, the `[total]` of every footer
    pub fn total_pages(&self) -> usize {
        self.sections.len()
    }

    /// Whether a directive block switched on paginated layout
    pub fn is_paginated(&self) -> bool {
        self.directives.enabled
    }

    /// Header and footer of a 1-based section
    pub fn furniture_for(&self, index: usize) -> Option<&PageFurniture> {
        index.checked_sub(1).and_then(|i| self.furniture.get(i))
    }

    /// Whether any section contains a diagram for the client-side renderer
    pub fn has_diagrams(&self) -> bool {
        self.sections
            .iter()
            .any(|s| s.html.contains("<div class=\"mermaid\">"))
    }

    /// Asset resolver configured for this conversion
    pub fn asset_resolver(&self) -> AssetResolver {
        AssetResolver::from_options(&self.options)
    }

    /// Document title: metadata first, then the first level-1 heading
    pub fn title(&self) -> Option<String> {
        if let Some(title) = &self.metadata.title {
            return Some(title.clone());
        }
        self.sections.iter().find_map(|s| {
            let start = s.html.find("<h1>")? + 4;
            let end = s.html[start..].find("</h1>")? + start;
            Some(strip_tags(&s.html[start..end]))
        })
    }

    /// Diagnostics rendered as warning strings
    pub fn warnings(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.to_string()).collect()
    }

    /// Meta fields referenced but not defined, sorted and deduplicated
    pub fn missing_meta(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .filter(|d| d.has_code(codes::META_NOT_FOUND))
            .filter_map(|d| d.target.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Fail when strict metadata mode is on and a field is missing
    pub fn check_strict(&self) -> Result<()> {
        if !self.options.strict_meta {
            return Ok(());
        }
        let missing = self.missing_meta();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::unresolved_meta(missing))
        }
    }

    /// Serializable overview of the model
    pub fn summary(&self) -> ModelSummary<'_> {
        ModelSummary {
            directives: &self.directives,
            metadata: &self.metadata,
            page_size: self.geometry.print_size(),
            sections: self
                .sections
                .iter()
                .map(|s| SectionSummary {
                    index: s.index,
                    classes: s.classes.as_deref(),
                    has_notes: s.notes.is_some(),
                    html_bytes: s.html.len(),
                })
                .collect(),
            diagnostics: &self.diagnostics,
        }
    }
}

/// Drop HTML tags and decode the basic entities
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
