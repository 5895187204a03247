//! aksara - One source, three layouts
//!
//! Converts annotated markdown into a self-contained HTML page, a PDF or a
//! PowerPoint deck. Every call ends in a [`ConvertResult`]: bytes plus a MIME
//! type on success, a message and an error kind on failure.
//!
//! # Example
//!
//! ```
//! use aksara::{convert, ConvertOptions, OutputFormat};
//!
//! let text = "<!--\naksara:true\ntype: presentation\n-->\n# Hello\n---\n# World";
//! let result = convert(text, &ConvertOptions::new(OutputFormat::Html));
//!
//! assert!(result.is_success());
//! assert_eq!(result.mime_type(), Some("text/html"));
//! ```

pub mod converter;
pub mod error;

pub use converter::{convert, render, Converter};
pub use error::{ConvertError, Result};

pub use aksara_ast::{ConvertErrorKind, ConvertOptions, ConvertResult, OutputFormat};
pub use aksara_core::{parse, DocumentModel, Settings};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
