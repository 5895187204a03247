//! Block tree to HTML
//!
//! One recursive writer for every block and inline kind. Layered images
//! carry an `aksara-layer-<kw>` class so page renderers can find and hoist
//! backdrops.

use aksara_ast::{
    Block, CodeBlock, FormatType, ImageMode, ImageRef, Inline, Layer, List, ListType, Quote, Table,
};

use crate::assets::AssetResolver;
use crate::diagnostics::Diagnostic;

/// Escape text for HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const COVER: &str =
    "background-size:cover;background-position:center;background-repeat:no-repeat;";

/// Writes HTML for blocks, resolving image sources on the way
pub struct HtmlWriter<'a> {
    assets: &'a AssetResolver,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> HtmlWriter<'a> {
    pub fn new(assets: &'a AssetResolver, diagnostics: &'a mut Vec<Diagnostic>) -> Self {
        Self {
            assets,
            diagnostics,
        }
    }

    /// Render blocks, one per line
    pub fn blocks(&mut self, blocks: &[Block]) -> String {
        blocks
            .iter()
            .map(|block| self.block(block))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn block(&mut self, block: &Block) -> String {
        match block {
            Block::Heading(h) => format!("<h{0}>{1}</h{0}>", h.level, self.inlines(&h.text)),
            Block::Paragraph(inlines) => format!("<p>{}</p>", self.inlines(inlines)),
            Block::List(list) => self.list(list),
            Block::Table(table) => self.table(table),
            Block::Code(code) => code_block(code),
            Block::Image(img) => self.image(img),
            Block::Quote(quote) => self.quote(quote),
            Block::ThematicBreak => "<hr />".to_string(),
            Block::RawHtml(html) => html.clone(),
        }
    }

    pub fn inlines(&mut self, inlines: &[Inline]) -> String {
        inlines.iter().map(|i| self.inline(i)).collect()
    }

    fn inline(&mut self, inline: &Inline) -> String {
        match inline {
            Inline::Text(text) => escape_html(text),
            Inline::Format(format, inner) => {
                let tag = match format {
                    FormatType::Bold => "strong",
                    FormatType::Italic => "em",
                    FormatType::Strikethrough => "del",
                    FormatType::Monospace => "code",
                };
                format!("<{tag}>{}</{tag}>", self.inline(inner))
            }
            Inline::Span(children) => self.inlines(children),
            Inline::Link(link) => format!(
                "<a href=\"{}\">{}</a>",
                escape_html(&link.url),
                self.inlines(&link.text)
            ),
            Inline::Image(img) => self.image(img),
            Inline::Break => "<br />".to_string(),
        }
    }

    fn list(&mut self, list: &List) -> String {
        let tag = match list.list_type {
            ListType::Unordered => "ul",
            ListType::Ordered => "ol",
        };

        let mut html = format!("<{tag}>");
        let mut depth = 0u8;
        for (i, item) in list.items.iter().enumerate() {
            let level = if i == 0 { 0 } else { item.level.min(depth + 1) };
            if i > 0 {
                if level > depth {
                    html.push_str(&format!("<{tag}>"));
                } else {
                    html.push_str("</li>");
                    while depth > level {
                        html.push_str(&format!("</{tag}></li>"));
                        depth -= 1;
                    }
                }
            }
            depth = level;
            html.push_str("<li>");
            html.push_str(&self.inlines(&item.content));
        }
        html.push_str("</li>");
        while depth > 0 {
            html.push_str(&format!("</{tag}></li>"));
            depth -= 1;
        }
        html.push_str(&format!("</{tag}>"));
        html
    }

    fn table(&mut self, table: &Table) -> String {
        let align = |col: usize| {
            table
                .alignments
                .get(col)
                .copied()
                .flatten()
                .map(|a| format!(" style=\"text-align:{}\"", a.as_css()))
                .unwrap_or_default()
        };

        let mut html = String::from("<table>\n<thead>\n<tr>");
        for (col, cell) in table.header.iter().enumerate() {
            html.push_str(&format!("<th{}>{}</th>", align(col), self.inlines(cell)));
        }
        html.push_str("</tr>\n</thead>\n<tbody>");
        for row in &table.rows {
            html.push_str("\n<tr>");
            for (col, cell) in row.iter().enumerate() {
                html.push_str(&format!("<td{}>{}</td>", align(col), self.inlines(cell)));
            }
            html.push_str("</tr>");
        }
        html.push_str("\n</tbody>\n</table>");
        html
    }

    fn quote(&mut self, quote: &Quote) -> String {
        let body: Vec<String> = quote
            .paragraphs
            .iter()
            .map(|p| format!("<p>{}</p>", self.inlines(p)))
            .collect();
        format!("<blockquote>\n{}\n</blockquote>", body.join("\n"))
    }

    /// HTML for one image according to its layout mode
    pub fn image(&mut self, img: &ImageRef) -> String {
        let src = escape_html(&self.assets.resolve(&img.src, self.diagnostics));
        let alt = escape_html(&img.alt);
        let z = img.z_index();

        match img.mode() {
            ImageMode::Backdrop => {
                let layer = img.layer.unwrap_or(Layer::Background);
                let frame = "position:absolute;top:0;left:0;width:100%;height:100%;";
                if layer == Layer::Background {
                    background_div(layer, &src, &alt, frame, z)
                } else {
                    format!(
                        "<img class=\"aksara-positioned aksara-layer-{}\" src=\"{src}\" alt=\"{alt}\" style=\"{frame}object-fit:contain;z-index:{z};\" />",
                        layer.keyword()
                    )
                }
            }
            ImageMode::Positioned => {
                let layer = img.layer.unwrap_or(Layer::Foreground);
                let mut frame = String::from("position:absolute;");
                for (prop, value) in img.placement.declarations() {
                    frame.push_str(&format!("{prop}:{};", escape_html(value)));
                }
                if layer == Layer::Background {
                    let p = &img.placement;
                    if p.width.is_none() && p.right.is_none() {
                        frame.push_str("right:0;");
                    }
                    if p.height.is_none() && p.bottom.is_none() {
                        frame.push_str("bottom:0;");
                    }
                    background_div(layer, &src, &alt, &frame, z)
                } else {
                    format!(
                        "<img class=\"aksara-positioned aksara-layer-{}\" src=\"{src}\" alt=\"{alt}\" style=\"{frame}object-fit:contain;z-index:{z};\" />",
                        layer.keyword()
                    )
                }
            }
            ImageMode::Sized => {
                let mut style = String::new();
                if let Some(w) = &img.placement.width {
                    style.push_str(&format!("width:{};", escape_html(w)));
                }
                if let Some(h) = &img.placement.height {
                    style.push_str(&format!("height:{};", escape_html(h)));
                }
                format!(
                    "<img class=\"aksara-sized\" src=\"{src}\" alt=\"{alt}\" style=\"{style}object-fit:contain;\" />"
                )
            }
            ImageMode::Inline => format!(
                "<img src=\"{src}\" alt=\"{alt}\" style=\"max-width:100%;height:auto;\" />"
            ),
        }
    }
}

fn background_div(layer: Layer, src: &str, alt: &str, frame: &str, z: u8) -> String {
    format!(
        "<div class=\"aksara-positioned aksara-layer-{}\" role=\"img\" aria-label=\"{alt}\" style=\"{frame}background-image:url('{src}');{COVER}z-index:{z};\"></div>",
        layer.keyword()
    )
}

fn code_block(code: &CodeBlock) -> String {
    if code.is_diagram() {
        return format!("<div class=\"mermaid\">\n{}\n</div>", code.content);
    }
    match &code.language {
        Some(lang) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            escape_html(lang),
            escape_html(&code.content)
        ),
        None => format!("<pre><code>{}</code></pre>", escape_html(&code.content)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parser::parse_blocks;

    fn render(text: &str) -> String {
        let assets = AssetResolver::default();
        let mut diags = Vec::new();
        HtmlWriter::new(&assets, &mut diags).blocks(&parse_blocks(text))
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_html("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_heading_and_inline() {
        assert_eq!(
            render("## Hello **big** `a<b`"),
            "<h2>Hello <strong>big</strong> <code>a&lt;b</code></h2>"
        );
    }

    #[test]
    fn test_nested_list_html() {
        assert_eq!(
            render("- a\n  - b\n- c"),
            "<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>"
        );
        assert_eq!(render("1. x\n2. y"), "<ol><li>x</li><li>y</li></ol>");
    }

    #[test]
    fn test_table_html() {
        let html = render("| A | B |\n|---|:-:|\n| 1 | 2 |");
        assert!(html.starts_with("<table>\n<thead>\n<tr><th>A</th><th style=\"text-align:center\">B</th></tr>"));
        assert!(html.contains("<tr><td>1</td><td style=\"text-align:center\">2</td></tr>"));
        assert!(html.ends_with("</tbody>\n</table>"));
    }

    #[test]
    fn test_code_escaped_diagram_verbatim() {
        assert_eq!(
            render("```html\n<b>x</b>\n```"),
            "<pre><code class=\"language-html\">&lt;b&gt;x&lt;/b&gt;</code></pre>"
        );
        assert_eq!(
            render("```mermaid\ngraph TD; A-->B\n```"),
            "<div class=\"mermaid\">\ngraph TD; A-->B\n</div>"
        );
    }

    #[test]
    fn test_background_full_bleed() {
        let html = render("![bg](photo.jpg)");
        assert!(html.starts_with("<div class=\"aksara-positioned aksara-layer-bg\""));
        assert!(html.contains("top:0;left:0;width:100%;height:100%;"));
        assert!(html.contains("background-image:url('photo.jpg')"));
        assert!(html.contains("z-index:1;"));
    }

    #[test]
    fn test_watermark_positioned() {
        let html = render("![wm t:0 l:0 w:10%](logo.png)");
        assert_eq!(
            html,
            "<img class=\"aksara-positioned aksara-layer-wm\" src=\"logo.png\" alt=\"\" style=\"position:absolute;top:0%;left:0%;width:10%;object-fit:contain;z-index:0;\" />"
        );
    }

    #[test]
    fn test_positioned_background_stretches() {
        let html = render("![bg l:50](half.jpg)");
        assert!(html.contains("position:absolute;left:50%;right:0;bottom:0;"));
    }

    #[test]
    fn test_sized_and_inline_images() {
        assert_eq!(
            render("![w:40% chart](c.png)"),
            "<img class=\"aksara-sized\" src=\"c.png\" alt=\"chart\" style=\"width:40%;object-fit:contain;\" />"
        );
        assert_eq!(
            render("See ![dog](d.png)"),
            "<p>See <img src=\"d.png\" alt=\"dog\" style=\"max-width:100%;height:auto;\" /></p>"
        );
    }

    #[test]
    fn test_sized_backdrop_layers_keep_their_size() {
        assert_eq!(
            render("![wm w:20%](logo.png)"),
            "<img class=\"aksara-sized\" src=\"logo.png\" alt=\"\" style=\"width:20%;object-fit:contain;\" />"
        );
        let html = render("![bg h:50%](photo.jpg)");
        assert!(html.contains("height:50%;object-fit:contain;"));
        assert!(!html.contains("width:100%"));
    }

    #[test]
    fn test_quote_and_rule() {
        assert_eq!(
            render("> wise\n\n***"),
            "<blockquote>\n<p>wise</p>\n</blockquote>\n<hr />"
        );
    }
}
