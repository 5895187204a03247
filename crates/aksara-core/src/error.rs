//! Error types for the core pipeline
//!
//! Parsing itself never fails; these errors come from loading settings and
//! from strict-mode checks requested by the caller.

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the core crate
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid TOML for [`Settings`](crate::Settings)
    #[error("Invalid settings: {0}")]
    Settings(#[from] toml::de::Error),

    /// Settings could not be serialized
    #[error("Cannot write settings: {0}")]
    SettingsWrite(#[from] toml::ser::Error),

    /// Strict mode found unresolved metadata variables
    #[error("Unresolved metadata: {}", fields.join(", "))]
    UnresolvedMeta { fields: Vec<String> },
}

impl CoreError {
    /// Create an unresolved-metadata error
    pub fn unresolved_meta(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::UnresolvedMeta {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}
