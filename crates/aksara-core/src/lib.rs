//! aksara-core - One source, three layouts
//!
//! Core library for aksara. It turns an annotated markdown document into a
//! [`DocumentModel`]: the directive set from the leading comment block, an
//! ordered list of sections with pre-rendered HTML, the running header and
//! footer of every page, and the resolved page geometry. Renderers consume
//! the model and never look at the raw markdown again.
//!
//! # Example
//!
//! ```
//! use aksara_ast::{ConvertOptions, OutputFormat};
//! use aksara_core::parse;
//!
//! let text = "<!--\naksara:true\nmeta:\n    company: Acme\n-->\n# ${meta.company}\n---\nSecond page";
//! let model = parse(text, &ConvertOptions::new(OutputFormat::Html));
//!
//! assert!(model.directives.enabled);
//! assert_eq!(model.sections.len(), 2);
//! assert!(model.sections[0].html.contains("<h1>Acme</h1>"));
//! ```

pub mod assets;
pub mod diagnostics;
pub mod directive;
pub mod error;
pub mod expr;
pub mod geometry;
pub mod header_footer;
pub mod markup;
pub mod model;
pub mod sections;
pub mod settings;

pub use assets::AssetResolver;
pub use diagnostics::{Diagnostic, Severity};
pub use directive::{DirectiveParser, ParsedDirectives};
pub use error::{CoreError, Result};
pub use expr::{EvalContext, ExpressionEvaluator};
pub use geometry::{PageGeometry, SlideSize};
pub use header_footer::{ItemAlign, PageFurniture, RunningItem};
pub use markup::MarkupEngine;
pub use model::{parse, parse_at, DocumentModel};
pub use sections::SectionSplitter;
pub use settings::Settings;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
