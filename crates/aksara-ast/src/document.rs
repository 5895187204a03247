//! Directives, metadata and sections
//!
//! These records are computed once per conversion and read, never mutated,
//! by every renderer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Layout family selected by the `type:` directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Paginated document, A4 portrait by default
    #[default]
    Document,
    /// Slide deck, 16:9 landscape by default
    Presentation,
}

impl DocumentKind {
    /// Parse the value of a `type:` directive line
    pub fn from_directive(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "document" | "doc" => Some(Self::Document),
            "presentation" | "slides" | "slide" => Some(Self::Presentation),
            _ => None,
        }
    }

    /// The lowercase directive spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Presentation => "presentation",
        }
    }
}

/// Document-level configuration read from the leading comment block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Directives {
    /// Whether a directive block was found (`false` means pass-through mode)
    pub enabled: bool,
    /// Document or presentation layout
    pub kind: DocumentKind,
    /// Path to a user stylesheet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_path: Option<String>,
    /// Page size: `WIDTHmmxHEIGHTmm` or `W:H`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Open-ended metadata map used by `${meta.<field>}`
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
    /// Header template, `|`-separated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Footer template, `|`-separated, supports `[page]` and `[total]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    /// Document-wide background image path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl Directives {
    /// Directives for a document without a directive block
    pub fn pass_through() -> Self {
        Self::default()
    }

    /// Look up a metadata field
    pub fn meta(&self, field: &str) -> Option<&str> {
        self.meta.get(field).map(|s| s.as_str())
    }

    /// Whether this is a slide deck
    pub fn is_presentation(&self) -> bool {
        self.kind == DocumentKind::Presentation
    }
}

/// Descriptive document properties
///
/// Partly mirrored from `meta.title`/`meta.subtitle`, partly set by the
/// caller through [`ConvertOptions::metadata`](crate::ConvertOptions).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// Creation timestamp (ISO-8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Modification timestamp (ISO-8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

impl DocumentMetadata {
    /// Create metadata with just a title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Fill unset fields from `other`
    pub fn merge_missing(&mut self, other: &DocumentMetadata) {
        fn fill(slot: &mut Option<String>, value: &Option<String>) {
            if slot.is_none() {
                slot.clone_from(value);
            }
        }
        fill(&mut self.title, &other.title);
        fill(&mut self.subtitle, &other.subtitle);
        fill(&mut self.author, &other.author);
        fill(&mut self.subject, &other.subject);
        fill(&mut self.keywords, &other.keywords);
        fill(&mut self.created, &other.created);
        fill(&mut self.modified, &other.modified);
    }
}

/// One page (document mode) or one slide (presentation mode)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    /// Raw markdown with class and notes comments removed
    pub raw_content: String,
    /// 1-based position in the document
    pub index: usize,
    /// Rendered HTML fragment
    pub html: String,
    /// Space-separated classes from `<!-- class: ... -->`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,
    /// Speaker notes from `<!-- notes: ... -->`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Section {
    /// Create an unrendered section
    pub fn new(index: usize, raw_content: impl Into<String>) -> Self {
        Self {
            raw_content: raw_content.into(),
            index,
            ..Default::default()
        }
    }

    /// Class list, empty when no annotation was given
    pub fn class_list(&self) -> Vec<&str> {
        self.classes
            .as_deref()
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_directive() {
        assert_eq!(
            DocumentKind::from_directive(" Presentation "),
            Some(DocumentKind::Presentation)
        );
        assert_eq!(
            DocumentKind::from_directive("document"),
            Some(DocumentKind::Document)
        );
        assert_eq!(DocumentKind::from_directive("poster"), None);
    }

    #[test]
    fn test_pass_through_defaults() {
        let d = Directives::pass_through();
        assert!(!d.enabled);
        assert_eq!(d.kind, DocumentKind::Document);
        assert!(d.meta.is_empty());
    }

    #[test]
    fn test_merge_missing_keeps_existing() {
        let mut meta = DocumentMetadata::with_title("Report");
        let other = DocumentMetadata {
            title: Some("Ignored".to_string()),
            author: Some("Dewi".to_string()),
            ..Default::default()
        };
        meta.merge_missing(&other);
        assert_eq!(meta.title.as_deref(), Some("Report"));
        assert_eq!(meta.author.as_deref(), Some("Dewi"));
    }

    #[test]
    fn test_section_class_list() {
        let mut section = Section::new(1, "# Hi");
        assert!(section.class_list().is_empty());
        section.classes = Some("lead  invert".to_string());
        assert_eq!(section.class_list(), vec!["lead", "invert"]);
    }

    #[test]
    fn test_directives_serialize() {
        let mut d = Directives {
            enabled: true,
            kind: DocumentKind::Presentation,
            ..Default::default()
        };
        d.meta.insert("company".to_string(), "Acme".to_string());
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"presentation\""));
        assert!(json.contains("\"company\":\"Acme\""));
        assert!(!json.contains("style_path"));
    }
}
