//! Section HTML back to slide items
//!
//! The markup engine writes a small, regular HTML dialect: one block per
//! line, fixed tag spellings, escaped text. This reader recognises blocks by
//! their opening tag and reduces each to an [`Item`]. Unknown markup is kept
//! as its text content.

use std::borrow::Cow;
use std::sync::OnceLock;

use aksara_ast::Placement;
use quick_xml::escape::unescape;
use regex::Regex;

use crate::slide::TextRun;

/// One structural item of a section
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Heading { level: u8, runs: Vec<TextRun> },
    Paragraph(Vec<TextRun>),
    List(Vec<ListEntry>),
    /// Cell text only; images become `[image]`
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Quote(Vec<Vec<TextRun>>),
    /// Preformatted text, also used for diagram sources
    Code(String),
    Image(ImageItem),
}

impl Item {
    /// Whether the item occupies space in the text flow
    pub fn is_flow(&self) -> bool {
        !matches!(self, Item::Image(img) if img.kind == ImageKind::Layered)
    }
}

/// A list item with its nesting depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// 0 for top-level items
    pub level: u8,
    pub ordered: bool,
    pub runs: Vec<TextRun>,
}

/// How an image takes part in layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Absolutely placed on a layer
    Layered,
    /// In flow with an explicit width or height
    Sized,
    /// In flow at natural size
    Inline,
}

/// An image reference recovered from markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    pub src: String,
    pub alt: String,
    pub kind: ImageKind,
    pub placement: Placement,
    pub z_index: u8,
}

/// Read every block of a section's HTML
pub fn read_items(html: &str) -> Vec<Item> {
    let mut items = Vec::new();
    let mut rest = html;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some(level) = heading_level(rest) {
            let close = format!("</h{level}>");
            let (inner, next) = take_block(&rest[4..], &close);
            items.push(Item::Heading {
                level,
                runs: inline_runs(inner),
            });
            rest = next;
        } else if let Some(body) = rest.strip_prefix("<p>") {
            let (inner, next) = take_block(body, "</p>");
            read_paragraph(inner, &mut items);
            rest = next;
        } else if rest.starts_with("<ul>") || rest.starts_with("<ol>") {
            let end = list_end(rest);
            items.push(Item::List(read_list(&rest[..end])));
            rest = &rest[end..];
        } else if let Some(body) = rest.strip_prefix("<table>") {
            let (inner, next) = take_block(body, "</table>");
            items.push(read_table(inner));
            rest = next;
        } else if let Some(body) = rest.strip_prefix("<blockquote>") {
            let (inner, next) = take_block(body, "</blockquote>");
            items.push(Item::Quote(read_quote(inner)));
            rest = next;
        } else if let Some(body) = rest.strip_prefix("<pre>") {
            let (inner, next) = take_block(body, "</pre>");
            items.push(Item::Code(unescape_text(&strip_tags(inner))));
            rest = next;
        } else if let Some(body) = rest.strip_prefix("<div class=\"mermaid\">") {
            let (inner, next) = take_block(body, "</div>");
            items.push(Item::Code(inner.trim().to_string()));
            rest = next;
        } else if rest.starts_with("<div class=\"aksara-positioned") {
            let (tag, next) = take_block(rest, "</div>");
            items.extend(image_from_tag(tag).map(Item::Image));
            rest = next;
        } else if rest.starts_with("<img ") {
            let end = rest.find('>').map_or(rest.len(), |i| i + 1);
            items.extend(image_from_tag(&rest[..end]).map(Item::Image));
            rest = &rest[end..];
        } else if rest.starts_with("<hr") {
            let end = rest.find('>').map_or(rest.len(), |i| i + 1);
            rest = &rest[end..];
        } else {
            let end = rest.find('\n').unwrap_or(rest.len());
            read_paragraph(&rest[..end], &mut items);
            rest = &rest[end..];
        }
    }

    items
}

fn heading_level(html: &str) -> Option<u8> {
    let bytes = html.as_bytes();
    if bytes.len() >= 4 && bytes[0] == b'<' && bytes[1] == b'h' && bytes[3] == b'>' {
        let level = bytes[2].checked_sub(b'0')?;
        (1..=6).contains(&level).then_some(level)
    } else {
        None
    }
}

/// Split at `close`; an unclosed block runs to the end
fn take_block<'a>(html: &'a str, close: &str) -> (&'a str, &'a str) {
    match html.find(close) {
        Some(i) => (&html[..i], &html[i + close.len()..]),
        None => (html, ""),
    }
}

fn read_paragraph(html: &str, items: &mut Vec<Item>) {
    let (text, images) = extract_images(html);
    let runs = inline_runs(&text);
    if runs.iter().any(|r| !r.text.trim().is_empty()) {
        items.push(Item::Paragraph(runs));
    }
    items.extend(images.into_iter().map(Item::Image));
}

fn image_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<img\b[^>]*>|<div class="aksara-positioned[^>]*>\s*</div>"#).unwrap()
    })
}

/// Pull image tags out of inline HTML
fn extract_images(html: &str) -> (Cow<'_, str>, Vec<ImageItem>) {
    let re = image_tag_re();
    let images = re
        .find_iter(html)
        .filter_map(|m| image_from_tag(m.as_str()))
        .collect();
    (re.replace_all(html, ""), images)
}

fn attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"([a-zA-Z][a-zA-Z0-9-]*)="([^"]*)""#).unwrap())
}

fn attr(tag: &str, name: &str) -> Option<String> {
    attr_re()
        .captures_iter(tag)
        .find(|cap| &cap[1] == name)
        .map(|cap| unescape_text(&cap[2]))
}

/// Build an image item from an `<img>` or positioned `<div>` tag
fn image_from_tag(tag: &str) -> Option<ImageItem> {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    let url_re = URL_RE.get_or_init(|| Regex::new(r"background-image:url\('([^']*)'\);?").unwrap());

    let class = attr(tag, "class").unwrap_or_default();
    let style = attr(tag, "style").unwrap_or_default();

    let (src, alt) = if tag.starts_with("<img") {
        (attr(tag, "src")?, attr(tag, "alt").unwrap_or_default())
    } else {
        let src = url_re.captures(&style)?[1].to_string();
        (src, attr(tag, "aria-label").unwrap_or_default())
    };

    let kind = if class.contains("aksara-positioned") {
        ImageKind::Layered
    } else if class.contains("aksara-sized") {
        ImageKind::Sized
    } else {
        ImageKind::Inline
    };

    let mut placement = Placement::default();
    let mut z_index = 2;
    if kind != ImageKind::Inline {
        for declaration in url_re.replace_all(&style, "").split(';') {
            let Some((prop, value)) = declaration.split_once(':') else {
                continue;
            };
            let value = value.trim().to_string();
            match prop.trim() {
                "top" => placement.top = Some(value),
                "right" => placement.right = Some(value),
                "bottom" => placement.bottom = Some(value),
                "left" => placement.left = Some(value),
                "width" => placement.width = Some(value),
                "height" => placement.height = Some(value),
                "z-index" => z_index = value.parse().unwrap_or(z_index),
                _ => {}
            }
        }
    }

    Some(ImageItem {
        src,
        alt,
        kind,
        placement,
        z_index,
    })
}

/// Byte offset just past the list that opens `html`
fn list_end(html: &str) -> usize {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"<(/?)(?:ul|ol)>").unwrap());

    let mut depth = 0usize;
    for cap in re.captures_iter(html) {
        if cap[1].is_empty() {
            depth += 1;
        } else {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return cap.get(0).map_or(html.len(), |m| m.end());
            }
        }
    }
    html.len()
}

fn read_list(html: &str) -> Vec<ListEntry> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"<(/?)(ul|ol|li)>").unwrap());

    let mut stack: Vec<bool> = Vec::new();
    let mut entries = Vec::new();
    let mut open: Option<usize> = None;

    for cap in re.captures_iter(html) {
        let Some(tag) = cap.get(0) else { continue };
        if let Some(start) = open.take() {
            entries.push(ListEntry {
                level: stack.len().saturating_sub(1) as u8,
                ordered: stack.last().copied().unwrap_or(false),
                runs: inline_runs(&html[start..tag.start()]),
            });
        }
        match (&cap[1], &cap[2]) {
            ("", "ul") => stack.push(false),
            ("", "ol") => stack.push(true),
            ("/", "ul") | ("/", "ol") => {
                stack.pop();
            }
            ("", "li") => open = Some(tag.end()),
            _ => {}
        }
    }

    entries
}

fn read_table(html: &str) -> Item {
    static ROW_RE: OnceLock<Regex> = OnceLock::new();
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    let row_re = ROW_RE.get_or_init(|| Regex::new(r"(?s)<tr>(.*?)</tr>").unwrap());
    let cell_re = CELL_RE.get_or_init(|| Regex::new(r"(?s)<t([hd])[^>]*>(.*?)</t[hd]>").unwrap());

    let mut header = Vec::new();
    let mut rows = Vec::new();
    for row in row_re.captures_iter(html) {
        let cells: Vec<(bool, String)> = cell_re
            .captures_iter(&row[1])
            .map(|cell| (&cell[1] == "h", cell_text(&cell[2])))
            .collect();
        if header.is_empty() && rows.is_empty() && cells.iter().all(|(th, _)| *th) {
            header = cells.into_iter().map(|(_, text)| text).collect();
        } else {
            rows.push(cells.into_iter().map(|(_, text)| text).collect());
        }
    }

    Item::Table { header, rows }
}

/// Plain cell text with images replaced by a placeholder
fn cell_text(html: &str) -> String {
    let text = image_tag_re().replace_all(html, "[image]");
    unescape_text(&strip_tags(&text)).trim().to_string()
}

fn read_quote(html: &str) -> Vec<Vec<TextRun>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?s)<p>(.*?)</p>").unwrap());
    re.captures_iter(html)
        .map(|cap| inline_runs(&cap[1]))
        .collect()
}

/// Inline HTML to formatted runs
pub fn inline_runs(html: &str) -> Vec<TextRun> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)([^>]*)>").unwrap());

    let mut state = TextRun::default();
    let (mut bold, mut italic, mut strike, mut mono) = (0u32, 0u32, 0u32, 0u32);
    let mut runs: Vec<TextRun> = Vec::new();
    let mut last = 0;

    for cap in re.captures_iter(html) {
        let Some(tag) = cap.get(0) else { continue };
        push_text(&mut runs, &html[last..tag.start()], &state);
        last = tag.end();

        let closing = !cap[1].is_empty();
        match cap[2].to_ascii_lowercase().as_str() {
            "strong" | "b" => step(&mut bold, closing),
            "em" | "i" => step(&mut italic, closing),
            "del" | "s" => step(&mut strike, closing),
            "code" => step(&mut mono, closing),
            "a" if closing => state.link = None,
            "a" => state.link = attr(tag.as_str(), "href"),
            "br" => match runs.last_mut() {
                Some(run) if !run.line_break => run.line_break = true,
                _ => runs.push(TextRun {
                    line_break: true,
                    ..Default::default()
                }),
            },
            _ => {}
        }
        state.bold = bold > 0;
        state.italic = italic > 0;
        state.strike = strike > 0;
        state.monospace = mono > 0;
    }
    push_text(&mut runs, &html[last..], &state);

    runs
}

fn step(counter: &mut u32, closing: bool) {
    if closing {
        *counter = counter.saturating_sub(1);
    } else {
        *counter += 1;
    }
}

fn push_text(runs: &mut Vec<TextRun>, raw: &str, state: &TextRun) {
    if raw.is_empty() {
        return;
    }
    let text = unescape_text(&raw.replace('\n', " "));
    runs.push(TextRun {
        text,
        line_break: false,
        ..state.clone()
    });
}

/// Remove every tag
pub fn strip_tags(html: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());
    re.replace_all(html, "").into_owned()
}

/// Decode entities; text with an unknown entity is kept as written
pub fn unescape_text(text: &str) -> String {
    unescape(text)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| text.to_string())
}
