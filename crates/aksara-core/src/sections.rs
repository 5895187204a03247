//! Section splitting
//!
//! The body is divided on full-line `---` rules. Rules inside fenced code
//! blocks are content, not separators.

use std::sync::OnceLock;

use aksara_ast::Section;
use regex::Regex;
use tracing::debug;

/// Splits a document body into numbered sections
pub struct SectionSplitter;

impl SectionSplitter {
    /// Split `body` into sections
    ///
    /// In pass-through mode (`paginated == false`) the whole body is one
    /// section and annotations are left in place.
    pub fn split(body: &str, paginated: bool) -> Vec<Section> {
        if !paginated {
            return vec![Section::new(1, body.trim())];
        }

        let sections: Vec<Section> = Self::chunks(body)
            .into_iter()
            .map(|chunk| chunk.trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .enumerate()
            .map(|(i, chunk)| Self::annotate(Section::new(i + 1, chunk)))
            .collect();

        debug!(count = sections.len(), "split body into sections");
        sections
    }

    /// Raw chunks between separator lines
    fn chunks(body: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut fence: Option<char> = None;

        for line in body.lines() {
            let trimmed = line.trim_start();
            if let Some(marker) = fence_marker(trimmed) {
                match fence {
                    None => fence = Some(marker),
                    Some(open) if open == marker => fence = None,
                    Some(_) => {}
                }
            } else if fence.is_none() && is_separator(line) {
                chunks.push(std::mem::take(&mut current));
                continue;
            }
            current.push_str(line);
            current.push('\n');
        }
        chunks.push(current);
        chunks
    }

    /// Pull class and notes comments out of the section content
    fn annotate(mut section: Section) -> Section {
        static CLASS_RE: OnceLock<Regex> = OnceLock::new();
        static NOTES_RE: OnceLock<Regex> = OnceLock::new();

        let class_re =
            CLASS_RE.get_or_init(|| Regex::new(r"^<!--\s*class:\s*(.*?)\s*-->[ \t]*\n?").unwrap());
        let notes_re =
            NOTES_RE.get_or_init(|| Regex::new(r"(?s)<!--\s*notes:\s*(.*?)\s*-->[ \t]*\n?").unwrap());

        let mut content = section.raw_content.clone();

        if let Some(cap) = class_re.captures(&content) {
            let classes = cap[1].split_whitespace().collect::<Vec<_>>().join(" ");
            if !classes.is_empty() {
                section.classes = Some(classes);
            }
            let end = cap.get(0).map(|m| m.end()).unwrap_or_default();
            content = content[end..].to_string();
        }

        let notes: Vec<String> = notes_re
            .captures_iter(&content)
            .map(|cap| cap[1].to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if !notes.is_empty() {
            section.notes = Some(notes.join("\n"));
            content = notes_re.replace_all(&content, "").into_owned();
        }

        section.raw_content = content.trim().to_string();
        section
    }
}

/// A full-line rule of three or more dashes
pub fn is_separator(line: &str) -> bool {
    static SEP_RE: OnceLock<Regex> = OnceLock::new();
    SEP_RE
        .get_or_init(|| Regex::new(r"^-{3,}\s*$").unwrap())
        .is_match(line)
}

/// The fence character if `line` opens or closes a fenced block
pub(crate) fn fence_marker(line: &str) -> Option<char> {
    if line.starts_with("```") {
        Some('`')
    } else if line.starts_with("~~~") {
        Some('~')
    } else {
        None
    }
}
