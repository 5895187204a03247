//! The terminal conversion result
//!
//! A result is either a byte payload with its MIME type, or a message. The
//! fields are private so a partially populated value cannot be built.

use serde::{Deserialize, Serialize};

/// Why a conversion failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvertErrorKind {
    /// Browser or slide-writer collaborator failed
    Backend,
    /// Strict mode rejected unresolved metadata
    Strict,
    /// Reading input or writing output failed
    Io,
    /// Anything else
    Internal,
}

/// Outcome of a `convert()` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertResult {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_kind: Option<ConvertErrorKind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

impl ConvertResult {
    /// A successful result
    pub fn success(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            mime_type: Some(mime_type.into()),
            error: None,
            error_kind: None,
            warnings: Vec::new(),
        }
    }

    /// A failed result; never carries bytes
    pub fn failure(kind: ConvertErrorKind, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            mime_type: None,
            error: Some(error.into()),
            error_kind: Some(kind),
            warnings: Vec::new(),
        }
    }

    /// Attach degradation warnings collected while converting
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Consume the result, returning the payload on success
    pub fn into_data(self) -> Option<Vec<u8>> {
        self.data
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_kind(&self) -> Option<ConvertErrorKind> {
        self.error_kind
    }

    /// Warnings for a conversion that succeeded in degraded form
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Whether the conversion succeeded but something was degraded
    pub fn is_degraded(&self) -> bool {
        self.success && !self.warnings.is_empty()
    }
}
