//! aksara-ast - Document model definitions
//!
//! This crate provides the types shared by every stage of an aksara
//! conversion: the directive set read from the leading comment block, the
//! ordered section list, the block tree produced by the markup engine, the
//! caller's conversion options and the terminal [`ConvertResult`].

pub mod block;
pub mod document;
pub mod inline;
pub mod options;
pub mod result;

pub use block::{Alignment, Block, CodeBlock, Heading, List, ListItem, ListType, Quote, Table};
pub use document::{Directives, DocumentKind, DocumentMetadata, Section};
pub use inline::{FormatType, ImageMode, ImageRef, Inline, Layer, Link, Placement};
pub use options::{ConvertOptions, Orientation, OutputFormat};
pub use result::{ConvertErrorKind, ConvertResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
