//! aksara CLI - Command-line interface library
//!
//! This library provides the CLI functionality for aksara:
//! - Convert: annotated markdown to HTML, PDF or PPTX
//! - Inspect: dump the parsed directives and sections as JSON
//! - Init-config: write a default `aksara.toml`
//!
//! # Library Usage
//!
//! ```ignore
//! use aksara_cli::{convert_command, ConvertArgs, FormatArg};
//!
//! let args = ConvertArgs {
//!     input: "deck.md".into(),
//!     format: Some(FormatArg::Pptx),
//!     ..Default::default()
//! };
//! convert_command(&args)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Slide deck next to the input
//! aksara convert deck.md -f pptx
//!
//! # Print-ready PDF with a dark theme
//! aksara convert report.md -f pdf --theme dark -o report.pdf
//!
//! # What did the parser see?
//! aksara inspect deck.md
//! ```

pub mod app;

pub use app::{
    convert_command, init_config_command, init_tracing, inspect_command, load_settings, run_cli,
    ConvertArgs, FormatArg,
};
