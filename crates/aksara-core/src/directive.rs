//! Directive block parser
//!
//! Reads document configuration from a single leading HTML comment:
//!
//! ```text
//! <!--
//! aksara:true
//! type: presentation
//! size: 16:9
//! meta:
//!     company: Acme
//! footer: ${meta.company} | [page] / [total]
//! -->
//! ```
//!
//! Parsing never fails. Unknown lines are skipped, and a missing or
//! malformed block leaves the document in pass-through mode.

use std::sync::OnceLock;

use aksara_ast::{Directives, DocumentKind, DocumentMetadata};
use regex::Regex;
use tracing::{debug, warn};

use crate::diagnostics::{codes, Diagnostic};

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Result of reading the directive block
#[derive(Debug, Clone, Default)]
pub struct ParsedDirectives {
    /// The directive set (`enabled == false` in pass-through mode)
    pub directives: Directives,
    /// Document body with the directive block removed
    pub body: String,
    /// Metadata mirrored from `meta.title`, `meta.subtitle` and friends
    pub metadata: DocumentMetadata,
    /// Recoverable problems found while parsing
    pub diagnostics: Vec<Diagnostic>,
}

/// Parser for the leading directive block
pub struct DirectiveParser;

impl DirectiveParser {
    /// Split `text` into directives and body
    pub fn parse(text: &str) -> ParsedDirectives {
        let leading = text.len() - text.trim_start().len();
        let rest = &text[leading..];

        if !rest.starts_with(COMMENT_OPEN) {
            debug!("no directive block, using pass-through mode");
            return Self::pass_through(text, None);
        }

        let inner_start = COMMENT_OPEN.len();
        let Some(close) = rest[inner_start..].find(COMMENT_CLOSE) else {
            warn!("directive comment is not terminated, using pass-through mode");
            let diag = Diagnostic::warning("directive comment is missing its closing `-->`")
                .with_code(codes::DIRECTIVE_BLOCK);
            return Self::pass_through(text, Some(diag));
        };

        let inner = &rest[inner_start..inner_start + close];
        let after = &rest[inner_start + close + COMMENT_CLOSE.len()..];

        let mut directives = Directives::default();
        let mut enabled = false;
        let mut in_meta = false;

        for raw in inner.lines() {
            if raw.trim().is_empty() {
                continue;
            }

            if in_meta {
                if is_indented(raw) {
                    if let Some((key, value)) = split_key_value(raw.trim()) {
                        directives.meta.insert(key.to_string(), unquote(value).to_string());
                        continue;
                    }
                }
                in_meta = false;
            }

            let Some((key, value)) = split_key_value(raw.trim()) else {
                debug!(line = raw.trim(), "ignoring directive line");
                continue;
            };
            let value = unquote(value);

            match key.to_ascii_lowercase().as_str() {
                "aksara" => enabled = value.eq_ignore_ascii_case("true"),
                "type" => match DocumentKind::from_directive(value) {
                    Some(kind) => directives.kind = kind,
                    None => debug!(value, "ignoring unknown document type"),
                },
                "style" => directives.style_path = non_empty(value),
                "size" => directives.size = non_empty(value),
                "header" => directives.header = non_empty(value),
                "footer" => directives.footer = non_empty(value),
                "background" => directives.background = non_empty(value),
                "meta" => in_meta = true,
                other => debug!(key = other, "ignoring unknown directive"),
            }
        }

        if !enabled {
            debug!("leading comment has no `aksara:true`, using pass-through mode");
            return Self::pass_through(text, None);
        }

        directives.enabled = true;
        let metadata = mirror_metadata(&directives);
        let body = after.strip_prefix("\r\n").or_else(|| after.strip_prefix('\n')).unwrap_or(after);

        ParsedDirectives {
            directives,
            body: body.to_string(),
            metadata,
            diagnostics: Vec::new(),
        }
    }

    fn pass_through(text: &str, diag: Option<Diagnostic>) -> ParsedDirectives {
        ParsedDirectives {
            directives: Directives::pass_through(),
            body: text.to_string(),
            metadata: DocumentMetadata::default(),
            diagnostics: diag.into_iter().collect(),
        }
    }
}

/// Split a `key: value` line
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    static KV_RE: OnceLock<Regex> = OnceLock::new();
    let re = KV_RE.get_or_init(|| Regex::new(r"^([A-Za-z_][\w.\-]*)\s*:\s*(.*)$").unwrap());

    re.captures(line).map(|cap| {
        let key = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
        let value = cap.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
        (key, value)
    })
}

fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

/// Strip one pair of matching surrounding quotes
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Mirror well-known meta fields into document metadata
fn mirror_metadata(directives: &Directives) -> DocumentMetadata {
    let field = |name: &str| directives.meta(name).map(str::to_string);
    DocumentMetadata {
        title: field("title"),
        subtitle: field("subtitle"),
        author: field("author"),
        subject: field("subject"),
        keywords: field("keywords"),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "<!--\naksara:true\ntype: presentation\nstyle: ./theme.css\nsize: 16:9\nmeta:\n    title: \"Quarterly Review\"\n    company: Acme\n\theadcount: 42\nheader: ${meta.company} | Q3\nfooter: Page [page] of [total]\nbackground: assets/bg.png\n-->\n# Hello";

    #[test]
    fn test_full_block() {
        let parsed = DirectiveParser::parse(FULL);
        let d = &parsed.directives;

        assert!(d.enabled);
        assert_eq!(d.kind, DocumentKind::Presentation);
        assert_eq!(d.style_path.as_deref(), Some("./theme.css"));
        assert_eq!(d.size.as_deref(), Some("16:9"));
        assert_eq!(d.meta("company"), Some("Acme"));
        assert_eq!(d.meta("title"), Some("Quarterly Review"));
        assert_eq!(d.meta("headcount"), Some("42"));
        assert_eq!(d.header.as_deref(), Some("${meta.company} | Q3"));
        assert_eq!(d.footer.as_deref(), Some("Page [page] of [total]"));
        assert_eq!(d.background.as_deref(), Some("assets/bg.png"));
        assert_eq!(parsed.body, "# Hello");
        assert_eq!(parsed.metadata.title.as_deref(), Some("Quarterly Review"));
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_no_block_is_pass_through() {
        let text = "# Title\n\n---\n\nMore";
        let parsed = DirectiveParser::parse(text);
        assert!(!parsed.directives.enabled);
        assert_eq!(parsed.body, text);
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_unterminated_block() {
        let text = "<!--\naksara:true\nsize: 16:9\n# Title";
        let parsed = DirectiveParser::parse(text);
        assert!(!parsed.directives.enabled);
        assert_eq!(parsed.body, text);
        assert!(parsed.diagnostics[0].has_code(codes::DIRECTIVE_BLOCK));
    }

    #[test]
    fn test_comment_without_marker() {
        let text = "<!-- just a note -->\nBody";
        let parsed = DirectiveParser::parse(text);
        assert!(!parsed.directives.enabled);
        assert_eq!(parsed.body, text);
    }

    #[test]
    fn test_unknown_lines_ignored() {
        let text = "<!--\naksara: true\ntransition: fade\nthis line is noise\ntype: document\n-->\nBody";
        let parsed = DirectiveParser::parse(text);
        assert!(parsed.directives.enabled);
        assert_eq!(parsed.directives.kind, DocumentKind::Document);
        assert_eq!(parsed.body, "Body");
    }

    #[test]
    fn test_meta_ends_at_unindented_line() {
        let text = "<!--\naksara:true\nmeta:\n  a: 1\nsize: 210mmx297mm\n  b: 2\n-->\n";
        let parsed = DirectiveParser::parse(text);
        let d = parsed.directives;
        assert_eq!(d.meta("a"), Some("1"));
        assert_eq!(d.meta("b"), None);
        assert_eq!(d.size.as_deref(), Some("210mmx297mm"));
    }

    #[test]
    fn test_leading_whitespace_allowed() {
        let parsed = DirectiveParser::parse("\n\n  <!--\naksara:true\n-->\nBody");
        assert!(parsed.directives.enabled);
        assert_eq!(parsed.body, "Body");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"a b\""), "a b");
        assert_eq!(unquote("'x'"), "x");
        assert_eq!(unquote("'x\""), "'x\"");
        assert_eq!(unquote("\""), "\"");
    }
}
