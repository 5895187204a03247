//! Inline markup
//!
//! Left-to-right scan that picks the earliest match among the inline
//! patterns. When two patterns start at the same offset, the one listed
//! first wins (`**` before `*`, image before link).

use std::sync::OnceLock;

use aksara_ast::{FormatType, Inline, Link};
use regex::{Captures, Regex};

use super::image::parse_image;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Break,
    Image,
    Link,
    Code,
    Bold,
    Strike,
    Italic,
}

struct Patterns {
    table: Vec<(Kind, Regex)>,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        table: vec![
            (Kind::Break, Regex::new(r"(?: {2,}|\\)\n").unwrap()),
            (
                Kind::Image,
                Regex::new(r#"!\[([^\]]*)\]\(\s*([^)\s]+)(?:\s+"[^"]*")?\s*\)"#).unwrap(),
            ),
            (
                Kind::Link,
                Regex::new(r#"\[([^\]]+)\]\(\s*([^)\s]+)(?:\s+"[^"]*")?\s*\)"#).unwrap(),
            ),
            (Kind::Code, Regex::new(r"`([^`]+)`").unwrap()),
            (Kind::Bold, Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").unwrap()),
            (Kind::Strike, Regex::new(r"~~(.+?)~~").unwrap()),
            (
                Kind::Italic,
                Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*|\b_([^_]+)_\b").unwrap(),
            ),
        ],
    })
}

/// First non-empty capture group
fn group<'t>(cap: &Captures<'t>, from: usize) -> &'t str {
    (from..cap.len())
        .find_map(|i| cap.get(i))
        .map(|m| m.as_str())
        .unwrap_or_default()
}

/// Parse inline formatting in text
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut result = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        let earliest = patterns()
            .table
            .iter()
            .filter_map(|(kind, re)| re.captures(remaining).map(|cap| (*kind, cap)))
            .min_by_key(|(_, cap)| cap.get(0).map(|m| m.start()).unwrap_or(usize::MAX));

        let Some((kind, cap)) = earliest else {
            push_text(&mut result, remaining);
            break;
        };
        let Some(whole) = cap.get(0) else {
            break;
        };

        if whole.start() > 0 {
            push_text(&mut result, &remaining[..whole.start()]);
        }

        let inline = match kind {
            Kind::Break => Inline::Break,
            Kind::Image => Inline::Image(parse_image(&cap[1], &cap[2])),
            Kind::Link => Inline::Link(Link {
                url: cap[2].to_string(),
                text: parse_inlines(&cap[1]),
            }),
            Kind::Code => Inline::Format(
                FormatType::Monospace,
                Box::new(Inline::Text(cap[1].to_string())),
            ),
            Kind::Bold => Inline::format(FormatType::Bold, parse_inlines(group(&cap, 1))),
            Kind::Strike => Inline::format(FormatType::Strikethrough, parse_inlines(&cap[1])),
            Kind::Italic => Inline::format(FormatType::Italic, parse_inlines(group(&cap, 1))),
        };
        result.push(inline);

        remaining = &remaining[whole.end()..];
    }

    result
}

/// Append text, merging with a preceding text node
fn push_text(result: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(prev)) = result.last_mut() {
        prev.push_str(text);
    } else {
        result.push(Inline::Text(text.to_string()));
    }
}

/// Whether a line holds nothing but images and whitespace
pub fn image_only(text: &str) -> Option<Vec<aksara_ast::ImageRef>> {
    let inlines = parse_inlines(text.trim());
    let mut images = Vec::new();
    for inline in inlines {
        match inline {
            Inline::Image(img) => images.push(img),
            Inline::Text(t) if t.trim().is_empty() => {}
            _ => return None,
        }
    }
    (!images.is_empty()).then_some(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aksara_ast::Layer;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_plain() {
        assert_eq!(parse_inlines("Hello world"), vec![text("Hello world")]);
        assert!(parse_inlines("").is_empty());
    }

    #[test]
    fn test_bold_beats_italic() {
        let inlines = parse_inlines("a **b** c");
        assert_eq!(
            inlines,
            vec![
                text("a "),
                Inline::Format(FormatType::Bold, Box::new(text("b"))),
                text(" c")
            ]
        );
    }

    #[test]
    fn test_nested_formatting() {
        let inlines = parse_inlines("**bold *and* italic**");
        let Inline::Format(FormatType::Bold, inner) = &inlines[0] else {
            panic!("expected bold, got {:?}", inlines);
        };
        assert!(matches!(**inner, Inline::Span(_)));
    }

    #[test]
    fn test_underscore_needs_word_boundary() {
        assert_eq!(parse_inlines("snake_case_name"), vec![text("snake_case_name")]);
        let inlines = parse_inlines("an _emphasised_ word");
        assert!(matches!(inlines[1], Inline::Format(FormatType::Italic, _)));
    }

    #[test]
    fn test_code_is_literal() {
        let inlines = parse_inlines("run `**not bold**` now");
        assert_eq!(
            inlines[1],
            Inline::Format(FormatType::Monospace, Box::new(text("**not bold**")))
        );
    }

    #[test]
    fn test_link_and_image() {
        let inlines = parse_inlines("see [the *docs*](https://x.io) ![lg t:1 r:1](logo.png)");
        let Inline::Link(link) = &inlines[1] else {
            panic!("expected link");
        };
        assert_eq!(link.url, "https://x.io");
        assert_eq!(link.text.len(), 2);

        let Inline::Image(img) = &inlines[3] else {
            panic!("expected image");
        };
        assert_eq!(img.layer, Some(Layer::Logo));
        assert_eq!(img.src, "logo.png");
    }

    #[test]
    fn test_strike_and_break() {
        let inlines = parse_inlines("~~old~~ new  \nnext");
        assert!(matches!(inlines[0], Inline::Format(FormatType::Strikethrough, _)));
        assert_eq!(inlines[2], Inline::Break);
        assert_eq!(inlines[3], text("next"));
    }

    #[test]
    fn test_image_only() {
        assert_eq!(image_only("![bg](a.jpg) ![wm](b.png)").map(|v| v.len()), Some(2));
        assert!(image_only("text ![bg](a.jpg)").is_none());
        assert!(image_only("plain").is_none());
    }
}
