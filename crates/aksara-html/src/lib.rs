//! aksara-html - Self-contained HTML output
//!
//! Renders a [`DocumentModel`] as a single HTML file: inlined base, theme and
//! user styles, one `<section>` per page with its running header and footer,
//! and a small navigation/zoom script. Full-page `bg` and `wm` images are
//! hoisted out of the section content into a backdrop layer so they always
//! sit beneath the text.
//!
//! Documents without a directive block render as one flowing article with
//! no pagination and no script.
//!
//! # Example
//!
//! ```
//! use aksara_ast::{ConvertOptions, OutputFormat};
//! use aksara_html::render_html;
//!
//! let model = aksara_core::parse(
//!     "<!--\naksara:true\n-->\n# One\n---\n# Two",
//!     &ConvertOptions::new(OutputFormat::Html),
//! );
//! let out = render_html(&model);
//! assert_eq!(out.html.matches("<section class=\"aksara-page\"").count(), 2);
//! ```

mod renderer;
pub mod script;
pub mod theme;

pub use renderer::{running_bar, split_backdrops, HtmlRenderer, RenderedHtml};
pub use theme::Theme;

use aksara_core::DocumentModel;

/// Render `model` as one HTML page
pub fn render_html(model: &DocumentModel) -> RenderedHtml {
    HtmlRenderer::new(model).render()
}
