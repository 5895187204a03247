//! Block tokenizer
//!
//! Turns one section's text into a block tree with a line-oriented state
//! machine. Fenced code is consumed whole, so nothing inside a fence is
//! ever seen by the table, list or inline rules.

use std::sync::OnceLock;

use aksara_ast::{
    Alignment, Block, CodeBlock, Heading, ImageMode, List, ListItem, ListType, Quote, Table,
};
use regex::Regex;

use super::inline::{image_only, parse_inlines};
use crate::sections::fence_marker;

/// Parser state for the block being built
#[derive(Debug, Clone, PartialEq)]
enum ParserState {
    /// Between blocks
    Root,
    /// Accumulated paragraph lines
    Paragraph(Vec<String>),
    /// List type and `(level, text)` items
    List(ListType, Vec<(u8, String)>),
    /// Quote lines; an empty string separates paragraphs
    Quote(Vec<String>),
}

struct BlockParser<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    blocks: Vec<Block>,
    state: ParserState,
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{1,4})\s+(.*?)\s*#*\s*$").unwrap())
}

fn list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)([-*+]|\d+[.)])\s+(.*)$").unwrap())
}

fn rule_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s{0,3}(?:\*{3,}|_{3,}|-{3,})\s*$").unwrap())
}

fn table_sep_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\|?\s*:?-+:?\s*(\|\s*:?-+:?\s*)*\|?\s*$").unwrap())
}

fn html_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*</?[A-Za-z][A-Za-z0-9-]*(\s[^>]*)?/?>").unwrap())
}

impl<'a> BlockParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
            blocks: Vec::new(),
            state: ParserState::Root,
        }
    }

    fn parse(mut self) -> Vec<Block> {
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            self.pos += 1;
            self.process_line(line);
        }
        self.flush_state();
        self.blocks
    }

    fn process_line(&mut self, line: &'a str) {
        if line.trim().is_empty() {
            if let ParserState::Quote(lines) = &mut self.state {
                lines.push(String::new());
                return;
            }
            self.flush_state();
            return;
        }

        let trimmed = line.trim_start();

        if let Some(marker) = fence_marker(trimmed) {
            self.flush_state();
            self.parse_fence(trimmed, marker);
            return;
        }

        if trimmed.starts_with("<!--") {
            self.flush_state();
            self.parse_comment(line);
            return;
        }

        if line.contains('|') && self.next_is_table_separator() {
            self.flush_state();
            self.parse_table(line);
            return;
        }

        if let Some(cap) = heading_re().captures(line) {
            self.flush_state();
            self.blocks.push(Block::Heading(Heading {
                level: cap[1].len() as u8,
                text: parse_inlines(&cap[2]),
            }));
            return;
        }

        if rule_re().is_match(line) {
            self.flush_state();
            self.blocks.push(Block::ThematicBreak);
            return;
        }

        if let Some(cap) = list_re().captures(line) {
            let list_type = if cap[2].starts_with(|c: char| c.is_ascii_digit()) {
                ListType::Ordered
            } else {
                ListType::Unordered
            };
            let level = (cap[1].replace('\t', "  ").len() / 2).min(u8::MAX as usize) as u8;
            let text = cap[3].to_string();

            match &mut self.state {
                ParserState::List(current, items) if level > 0 || *current == list_type => {
                    items.push((level, text));
                }
                _ => {
                    self.flush_state();
                    self.state = ParserState::List(list_type, vec![(level, text)]);
                }
            }
            return;
        }

        if let Some(rest) = trimmed.strip_prefix('>') {
            let text = rest.strip_prefix(' ').unwrap_or(rest).to_string();
            match &mut self.state {
                ParserState::Quote(lines) => lines.push(text),
                _ => {
                    self.flush_state();
                    self.state = ParserState::Quote(vec![text]);
                }
            }
            return;
        }

        // Indented continuation of the last list item
        if let ParserState::List(_, items) = &mut self.state {
            if line.starts_with(' ') || line.starts_with('\t') {
                if let Some((_, text)) = items.last_mut() {
                    text.push(' ');
                    text.push_str(trimmed);
                    return;
                }
            }
        }

        if let Some(images) = image_only(line) {
            if images.iter().all(|img| img.mode() != ImageMode::Inline) {
                self.flush_state();
                self.blocks.extend(images.into_iter().map(Block::Image));
                return;
            }
        }

        if html_re().is_match(line) {
            self.flush_state();
            self.blocks.push(Block::RawHtml(line.trim().to_string()));
            return;
        }

        match &mut self.state {
            ParserState::Paragraph(lines) => lines.push(trimmed.to_string()),
            _ => {
                self.flush_state();
                self.state = ParserState::Paragraph(vec![trimmed.to_string()]);
            }
        }
    }

    fn next_is_table_separator(&self) -> bool {
        self.lines
            .get(self.pos)
            .is_some_and(|next| next.contains('-') && table_sep_re().is_match(next))
    }

    fn parse_fence(&mut self, opening: &str, marker: char) {
        let language = opening
            .trim_start_matches(marker)
            .split_whitespace()
            .next()
            .map(str::to_string);

        let mut content = Vec::new();
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            self.pos += 1;
            if fence_marker(line.trim_start()) == Some(marker)
                && line.trim().trim_start_matches(marker).is_empty()
            {
                break;
            }
            content.push(line);
        }

        self.blocks.push(Block::Code(CodeBlock {
            language,
            content: content.join("\n"),
        }));
    }

    fn parse_comment(&mut self, first: &str) {
        let mut html = first.trim().to_string();
        while !html.contains("-->") && self.pos < self.lines.len() {
            html.push('\n');
            html.push_str(self.lines[self.pos]);
            self.pos += 1;
        }
        self.blocks.push(Block::RawHtml(html));
    }

    fn parse_table(&mut self, header_line: &str) {
        let header: Vec<_> = split_row(header_line).iter().map(|c| parse_inlines(c)).collect();
        let columns = header.len();

        let separator = self.lines[self.pos];
        self.pos += 1;
        let mut alignments: Vec<Option<Alignment>> =
            split_row(separator).iter().map(|c| alignment(c)).collect();
        alignments.resize(columns, None);

        let mut rows = Vec::new();
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            if line.trim().is_empty() || !line.contains('|') {
                break;
            }
            self.pos += 1;

            let mut cells: Vec<_> = split_row(line).iter().map(|c| parse_inlines(c)).collect();
            cells.resize_with(columns, Vec::new);
            rows.push(cells);
        }

        self.blocks.push(Block::Table(Table {
            header,
            alignments,
            rows,
        }));
    }

    fn flush_state(&mut self) {
        let state = std::mem::replace(&mut self.state, ParserState::Root);
        match state {
            ParserState::Root => {}
            ParserState::Paragraph(lines) => {
                if !lines.is_empty() {
                    self.blocks.push(Block::Paragraph(parse_inlines(&lines.join("\n"))));
                }
            }
            ParserState::List(list_type, items) => {
                if !items.is_empty() {
                    self.blocks.push(Block::List(List {
                        list_type,
                        items: items
                            .into_iter()
                            .map(|(level, text)| ListItem {
                                content: parse_inlines(&text),
                                level,
                            })
                            .collect(),
                    }));
                }
            }
            ParserState::Quote(lines) => {
                let paragraphs = lines
                    .split(|l| l.is_empty())
                    .filter(|chunk| !chunk.is_empty())
                    .map(|chunk| parse_inlines(&chunk.join("\n")))
                    .collect::<Vec<_>>();
                if !paragraphs.is_empty() {
                    self.blocks.push(Block::Quote(Quote { paragraphs }));
                }
            }
        }
    }
}

/// Cells of a pipe table row
fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn alignment(cell: &str) -> Option<Alignment> {
    match (cell.starts_with(':'), cell.ends_with(':')) {
        (true, true) => Some(Alignment::Center),
        (false, true) => Some(Alignment::Right),
        (true, false) => Some(Alignment::Left),
        (false, false) => None,
    }
}

/// Parse section text into blocks
pub fn parse_blocks(text: &str) -> Vec<Block> {
    BlockParser::new(text).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aksara_ast::{Inline, Layer};

    #[test]
    fn test_headings_and_paragraphs() {
        let blocks = parse_blocks("# Title\n\nFirst line\nsecond line\n\n#### Deep\n##### too deep");
        assert_eq!(blocks.len(), 4);
        assert!(matches!(&blocks[0], Block::Heading(h) if h.level == 1));
        assert_eq!(
            blocks[1],
            Block::Paragraph(vec![Inline::Text("First line\nsecond line".to_string())])
        );
        assert!(matches!(&blocks[2], Block::Heading(h) if h.level == 4));
        assert!(matches!(&blocks[3], Block::Paragraph(_)));
    }

    #[test]
    fn test_fence_protects_content() {
        let blocks = parse_blocks("```rust\n# not a heading\n| a | b |\n|---|---|\n```\nafter");
        assert_eq!(blocks.len(), 2);
        let Block::Code(code) = &blocks[0] else {
            panic!("expected code block");
        };
        assert_eq!(code.language.as_deref(), Some("rust"));
        assert_eq!(code.content, "# not a heading\n| a | b |\n|---|---|");
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        let blocks = parse_blocks("~~~\ncode\nmore");
        assert_eq!(blocks.len(), 1);
        assert!(matches!(&blocks[0], Block::Code(c) if c.content == "code\nmore"));
    }

    #[test]
    fn test_table() {
        let blocks = parse_blocks("| Name | Qty |\n|:-----|----:|\n| Apple | 3 |\n| Pear |\n\ntext");
        let Block::Table(table) = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.alignments, vec![Some(Alignment::Left), Some(Alignment::Right)]);
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows[1][1].is_empty());
        assert!(matches!(blocks[1], Block::Paragraph(_)));
    }

    #[test]
    fn test_nested_list() {
        let blocks = parse_blocks("- one\n  - one.a\n- two\n1. first");
        assert_eq!(blocks.len(), 2);
        let Block::List(list) = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(list.list_type, ListType::Unordered);
        let levels: Vec<u8> = list.items.iter().map(|i| i.level).collect();
        assert_eq!(levels, vec![0, 1, 0]);
        assert!(matches!(&blocks[1], Block::List(l) if l.list_type == ListType::Ordered));
    }

    #[test]
    fn test_bold_line_is_not_list() {
        let blocks = parse_blocks("**Note** read this");
        assert!(matches!(blocks[0], Block::Paragraph(_)));
    }

    #[test]
    fn test_quote_paragraphs() {
        let blocks = parse_blocks("> one\n> two\n>\n> three\n\nafter");
        let Block::Quote(quote) = &blocks[0] else {
            panic!("expected quote");
        };
        assert_eq!(quote.paragraphs.len(), 2);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_thematic_break() {
        let blocks = parse_blocks("a\n\n---\n\nb");
        assert_eq!(blocks[1], Block::ThematicBreak);
    }

    #[test]
    fn test_layered_image_line() {
        let blocks = parse_blocks("![bg](bg.jpg)\n# Title\n![plain](p.png)");
        let Block::Image(img) = &blocks[0] else {
            panic!("expected image block");
        };
        assert_eq!(img.layer, Some(Layer::Background));
        assert!(matches!(blocks[2], Block::Paragraph(_)));
    }

    #[test]
    fn test_raw_html() {
        let blocks = parse_blocks("<div class=\"box\">\ninside\n</div>\n<!-- a\ncomment -->");
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0], Block::RawHtml("<div class=\"box\">".to_string()));
        assert_eq!(blocks[3], Block::RawHtml("<!-- a\ncomment -->".to_string()));
    }

    #[test]
    fn test_list_continuation() {
        let blocks = parse_blocks("- long item\n  wrapped here");
        let Block::List(list) = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(list.items.len(), 1);
        assert_eq!(
            list.items[0].content,
            vec![Inline::Text("long item wrapped here".to_string())]
        );
    }
}
