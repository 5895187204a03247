//! Page shell assembly

use std::sync::OnceLock;

use aksara_ast::Section;
use aksara_core::markup::escape_html;
use aksara_core::{Diagnostic, DocumentModel, RunningItem};
use regex::Regex;
use tracing::debug;

use crate::script::{MERMAID_INIT, MERMAID_SRC, NAV_SCRIPT};
use crate::theme::{load_stylesheet, Theme, BASE_CSS, CONTROLS_CSS};

/// A rendered page plus the problems found while assembling it
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedHtml {
    pub html: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds the self-contained HTML page for a [`DocumentModel`]
///
/// The building blocks ([`stylesheet`](Self::stylesheet),
/// [`page`](Self::page), [`head_meta`](Self::head_meta)) are public so the
/// print backend can lay out the same pages without the navigation layer.
pub struct HtmlRenderer<'a> {
    model: &'a DocumentModel,
    theme: Theme,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(model: &'a DocumentModel) -> Self {
        let mut diagnostics = Vec::new();
        let theme = Theme::resolve(&model.options.theme, &mut diagnostics);
        Self {
            model,
            theme,
            diagnostics,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Page-size variables, base rules, theme and user stylesheet
    pub fn stylesheet(&mut self) -> String {
        let (width, height) = self.model.geometry.css_size();
        let mut css = format!(":root{{--page-width:{width};--page-height:{height};}}\n");
        css.push_str(BASE_CSS);
        css.push('\n');
        css.push_str(self.theme.css());

        if let Some(style) = self.model.directives.style_path.as_deref() {
            let user = load_stylesheet(
                style,
                self.model.options.base_path.as_deref(),
                &mut self.diagnostics,
            );
            if !user.is_empty() {
                css.push('\n');
                css.push_str(user.trim_end());
            }
        }
        css
    }

    /// `<meta>` and `<title>` elements for the document head
    pub fn head_meta(&self) -> String {
        let metadata = &self.model.metadata;
        let title = self.model.title().unwrap_or_else(|| "Untitled".to_string());

        let mut head = String::from(
            "<meta charset=\"utf-8\" />\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n",
        );
        head.push_str(&format!("<title>{}</title>\n", escape_html(&title)));
        for (name, value) in [
            ("author", &metadata.author),
            ("description", &metadata.subject),
            ("keywords", &metadata.keywords),
        ] {
            if let Some(value) = value {
                head.push_str(&format!(
                    "<meta name=\"{name}\" content=\"{}\" />\n",
                    escape_html(value)
                ));
            }
        }
        head.push_str("<meta name=\"generator\" content=\"aksara\" />\n");
        head
    }

    /// One `<section>` with backdrop, header, content, footer and notes
    pub fn page(&self, section: &Section) -> String {
        let (layers, content) = split_backdrops(&section.html);

        let mut classes = String::from("aksara-page");
        for class in section.class_list() {
            classes.push(' ');
            classes.push_str(&escape_html(class));
        }

        let mut html = format!(
            "<section class=\"{classes}\" id=\"page-{0}\" data-page=\"{0}\">\n",
            section.index
        );

        let backdrop: Vec<&str> = self
            .model
            .background_html
            .as_deref()
            .into_iter()
            .chain(layers.iter().map(String::as_str))
            .collect();
        if !backdrop.is_empty() {
            html.push_str("<div class=\"aksara-backdrop\">\n");
            html.push_str(&backdrop.join("\n"));
            html.push_str("\n</div>\n");
        }

        if let Some(furniture) = self.model.furniture_for(section.index) {
            html.push_str(&running_bar("header", &furniture.header));
        }
        html.push_str("<div class=\"aksara-content\">\n");
        html.push_str(&content);
        html.push_str("\n</div>\n");
        if let Some(furniture) = self.model.furniture_for(section.index) {
            html.push_str(&running_bar("footer", &furniture.footer));
        }

        if let Some(notes) = &section.notes {
            html.push_str(&format!(
                "<aside class=\"notes\">{}</aside>\n",
                escape_html(notes)
            ));
        }
        html.push_str("</section>");
        html
    }

    /// Diagram renderer tags, empty when no diagram is present
    pub fn diagram_scripts(&self) -> String {
        if self.model.has_diagrams() {
            format!("<script src=\"{MERMAID_SRC}\"></script>\n<script>\n{MERMAID_INIT}\n</script>\n")
        } else {
            String::new()
        }
    }

    /// Diagnostics collected so far
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Assemble the complete page
    pub fn render(mut self) -> RenderedHtml {
        let model = self.model;
        let css = self.stylesheet();
        let lang = escape_html(&model.options.locale);

        let mut html = format!("<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n");
        html.push_str(&self.head_meta());
        html.push_str("<style>\n");
        html.push_str(&css);
        if model.is_paginated() {
            html.push('\n');
            html.push_str(CONTROLS_CSS);
        }
        html.push_str("\n</style>\n</head>\n");

        if model.is_paginated() {
            html.push_str(&format!(
                "<body class=\"aksara aksara-{} aksara-theme-{}\">\n<main class=\"aksara-deck\">\n",
                model.directives.kind.as_str(),
                self.theme.name()
            ));
            for section in &model.sections {
                html.push_str(&self.page(section));
                html.push('\n');
            }
            html.push_str("</main>\n");
            html.push_str(CONTROLS_HTML);
            html.push_str(&format!("<script>\n{NAV_SCRIPT}\n</script>\n"));
        } else {
            html.push_str(&format!(
                "<body class=\"aksara aksara-flow-mode aksara-theme-{}\">\n<main class=\"aksara-flow\">\n",
                self.theme.name()
            ));
            for section in &model.sections {
                html.push_str(&section.html);
                html.push('\n');
            }
            html.push_str("</main>\n");
        }

        html.push_str(&self.diagram_scripts());
        html.push_str("</body>\n</html>\n");

        debug!(
            bytes = html.len(),
            pages = model.total_pages(),
            theme = self.theme.name(),
            "rendered html"
        );

        RenderedHtml {
            html,
            diagnostics: self.diagnostics,
        }
    }
}

const CONTROLS_HTML: &str = r#"<nav class="aksara-controls" aria-label="Page navigation">
<button type="button" data-action="prev" title="Previous">&#8249;</button>
<span class="aksara-counter"></span>
<button type="button" data-action="next" title="Next">&#8250;</button>
<button type="button" data-action="zoom-out" title="Zoom out">&#8722;</button>
<button type="button" data-action="zoom-in" title="Zoom in">+</button>
<button type="button" data-action="fit" title="Fit to window">&#9634;</button>
</nav>
"#;

/// Header or footer bar, empty when there are no items
pub fn running_bar(kind: &str, items: &[RunningItem]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut html = format!("<{kind} class=\"aksara-{kind}\">");
    for item in items {
        html.push_str(&format!(
            "<div class=\"aksara-item aksara-align-{}\">{}</div>",
            item.align.as_css(),
            item.html
        ));
    }
    html.push_str(&format!("</{kind}>\n"));
    html
}

/// Pull full-page `bg`/`wm` fragments out of section HTML
///
/// Returns the fragments in document order and the remaining HTML. Lines
/// that held nothing but a fragment are dropped.
pub fn split_backdrops(html: &str) -> (Vec<String>, String) {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(
            r#"<div class="aksara-positioned aksara-layer-(?:bg|wm)"[^>]*></div>|<img class="aksara-positioned aksara-layer-(?:bg|wm)"[^>]*/>"#,
        )
        .unwrap()
    });

    let mut layers = Vec::new();
    let mut lines = Vec::new();
    for line in html.split('\n') {
        if !re.is_match(line) {
            lines.push(line.to_string());
            continue;
        }
        layers.extend(re.find_iter(line).map(|m| m.as_str().to_string()));
        let rest = re.replace_all(line, "");
        if !rest.trim().is_empty() {
            lines.push(rest.into_owned());
        }
    }
    (layers, lines.join("\n"))
}
