//! Conversion diagnostics
//!
//! Every permissive recovery in the pipeline (unknown expression, missing
//! asset, unreadable stylesheet...) records a [`Diagnostic`] so callers can
//! tell a degraded conversion from a clean one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable diagnostic codes
pub mod codes {
    /// Directive block missing or unterminated
    pub const DIRECTIVE_BLOCK: &str = "W001";
    /// `${...}` expression left unevaluated
    pub const EXPRESSION: &str = "W002";
    /// `${meta.<field>}` not present in the meta map
    pub const META_NOT_FOUND: &str = "W003";
    /// Image or other asset could not be read
    pub const ASSET_NOT_FOUND: &str = "W004";
    /// Stylesheet or theme could not be loaded
    pub const STYLE: &str = "W005";
    /// Diagram collaborator did not finish in time
    pub const DIAGRAM_TIMEOUT: &str = "W006";
    /// Images did not finish loading in time
    pub const IMAGE_TIMEOUT: &str = "W007";
    /// `size` directive could not be parsed
    pub const PAGE_SIZE: &str = "W008";
}

/// A diagnostic message from the pipeline
///
/// # Example
///
/// ```
/// use aksara_core::diagnostics::{codes, Diagnostic, Severity};
///
/// let diag = Diagnostic::warning("asset not found: logo.png")
///     .with_code(codes::ASSET_NOT_FOUND)
///     .with_section(2);
/// assert_eq!(diag.severity, Severity::Warning);
/// assert_eq!(diag.to_string(), "W004: asset not found: logo.png (section 2)");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level of the diagnostic
    pub severity: Severity,

    /// The diagnostic message
    pub message: String,

    /// Optional warning code (e.g., "W003")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// 1-based section the issue occurred in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<usize>,

    /// The thing the diagnostic is about (field name, asset path...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Additional help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Something was degraded but the conversion continued
    Warning,

    /// A problem that a strict caller may treat as fatal
    Error,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            code: None,
            section: None,
            target: None,
            help: None,
        }
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Create an info diagnostic
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Set the diagnostic code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the section index
    pub fn with_section(mut self, section: usize) -> Self {
        self.section = Some(section);
        self
    }

    /// Set the target
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Whether the diagnostic carries the given code
    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = &self.code {
            write!(f, "{}: ", code)?;
        }
        f.write_str(&self.message)?;
        if let Some(section) = self.section {
            write!(f, " (section {})", section)?;
        }
        Ok(())
    }
}
