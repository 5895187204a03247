//! Block-level elements for section structure
//!
//! The markup engine tokenizes a section into these blocks and a single
//! recursive renderer turns them into HTML.

use serde::{Deserialize, Serialize};

use crate::inline::{ImageRef, Inline};

/// Fenced-code languages handed verbatim to the diagram collaborator
pub const DIAGRAM_LANGUAGES: &[&str] = &["mermaid"];

/// Block-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    /// A heading, levels 1-4
    Heading(Heading),
    /// A paragraph of text
    Paragraph(Vec<Inline>),
    /// An ordered or unordered list
    List(List),
    /// A pipe table
    Table(Table),
    /// A fenced code block
    Code(CodeBlock),
    /// A standalone layered or sized image
    Image(ImageRef),
    /// A block quote
    Quote(Quote),
    /// A horizontal rule
    ThematicBreak,
    /// HTML passed through untouched
    RawHtml(String),
}

/// A section heading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (1-4)
    pub level: u8,
    /// Heading text content
    pub text: Vec<Inline>,
}

/// A list (ordered or unordered)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    /// Type of list
    pub list_type: ListType,
    /// List items, nesting expressed by `level`
    pub items: Vec<ListItem>,
}

/// List type variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListType {
    /// Unordered/bullet list
    Unordered,
    /// Ordered/numbered list
    Ordered,
}

/// A single list item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Item content
    pub content: Vec<Inline>,
    /// Nesting level (0-based)
    pub level: u8,
}

/// A pipe table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Header cells
    pub header: Vec<Vec<Inline>>,
    /// Per-column alignment from the separator row
    pub alignments: Vec<Option<Alignment>>,
    /// Body rows
    pub rows: Vec<Vec<Vec<Inline>>>,
}

impl Table {
    /// Number of columns, from the header row
    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

/// Text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    /// CSS `text-align` value
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// A fenced code block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Language tag after the opening fence
    pub language: Option<String>,
    /// The literal content
    pub content: String,
}

impl CodeBlock {
    /// Whether the block is a diagram left for client-side rendering
    pub fn is_diagram(&self) -> bool {
        self.language
            .as_deref()
            .is_some_and(|lang| DIAGRAM_LANGUAGES.contains(&lang))
    }
}

/// A block quote
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Quote {
    /// Quoted lines, one paragraph each
    pub paragraphs: Vec<Vec<Inline>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_detection() {
        let code = CodeBlock {
            language: Some("mermaid".to_string()),
            content: "graph TD; A-->B".to_string(),
        };
        assert!(code.is_diagram());

        let code = CodeBlock {
            language: Some("rust".to_string()),
            content: "fn main() {}".to_string(),
        };
        assert!(!code.is_diagram());
    }

    #[test]
    fn test_table_columns() {
        let table = Table {
            header: vec![vec![Inline::Text("A".into())], vec![Inline::Text("B".into())]],
            alignments: vec![None, Some(Alignment::Right)],
            rows: vec![],
        };
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.alignments[1].map(|a| a.as_css()), Some("right"));
    }

    #[test]
    fn test_list_types() {
        let list = List {
            list_type: ListType::Ordered,
            items: vec![ListItem {
                content: vec![Inline::Text("one".into())],
                level: 0,
            }],
        };
        assert_eq!(list.list_type, ListType::Ordered);
        assert_eq!(list.items.len(), 1);
    }
}
