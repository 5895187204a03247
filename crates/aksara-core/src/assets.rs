//! Asset path resolution and image embedding
//!
//! Relative image paths are resolved against the caller's base path. When
//! embedding is on, local files are inlined as `data:` URIs so the print and
//! slide backends never touch the file system. An unreadable file keeps its
//! original reference and records a W004 diagnostic.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use aksara_ast::ConvertOptions;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::diagnostics::{codes, Diagnostic};
use crate::markup::escape_html;

/// Resolves image references for one conversion
#[derive(Debug, Clone, Default)]
pub struct AssetResolver {
    base: Option<PathBuf>,
    embed: bool,
}

impl AssetResolver {
    pub fn new(base: Option<PathBuf>, embed: bool) -> Self {
        Self { base, embed }
    }

    /// Resolver configured from conversion options
    pub fn from_options(options: &ConvertOptions) -> Self {
        Self::new(options.base_path.clone(), options.should_embed_images())
    }

    /// Whether local files are inlined
    pub fn embeds(&self) -> bool {
        self.embed
    }

    /// Remote URLs and data URIs are never read from disk
    pub fn is_external(src: &str) -> bool {
        let lower = src.trim_start().to_ascii_lowercase();
        lower.starts_with("http://")
            || lower.starts_with("https://")
            || lower.starts_with("//")
            || lower.starts_with("data:")
    }

    /// File system path of a local reference
    pub fn local_path(&self, src: &str) -> PathBuf {
        let src = src.strip_prefix("file://").unwrap_or(src);
        let path = Path::new(src);
        match &self.base {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Read the bytes behind a reference, decoding `data:` URIs in place
    pub fn read(&self, src: &str) -> io::Result<Vec<u8>> {
        if let Some(rest) = src.strip_prefix("data:") {
            return decode_data_uri(rest);
        }
        if Self::is_external(src) {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("remote asset cannot be read: {src}"),
            ));
        }
        std::fs::read(self.local_path(src))
    }

    /// Inline a local file as a `data:` URI
    pub fn data_uri(&self, src: &str) -> io::Result<String> {
        let bytes = std::fs::read(self.local_path(src))?;
        let mime = mime_for(src);
        Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
    }

    /// The reference to write into the output
    ///
    /// Returns the data URI when embedding succeeds, the original reference
    /// otherwise.
    pub fn resolve(&self, src: &str, diagnostics: &mut Vec<Diagnostic>) -> String {
        if !self.embed || Self::is_external(src) || src.is_empty() {
            return src.to_string();
        }

        match self.data_uri(src) {
            Ok(uri) => {
                debug!(src, "embedded asset");
                uri
            }
            Err(err) => {
                warn!(src, error = %err, "asset not found, keeping reference");
                diagnostics.push(
                    Diagnostic::warning(format!("asset not found: {src}"))
                        .with_code(codes::ASSET_NOT_FOUND)
                        .with_target(src),
                );
                src.to_string()
            }
        }
    }
}

/// MIME type guessed from a file name
pub fn mime_for(path: &str) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// MIME type declared by a `data:` URI
pub fn data_uri_mime(src: &str) -> Option<&str> {
    let rest = src.strip_prefix("data:")?;
    let header = rest.split(',').next()?;
    let mime = header.split(';').next()?;
    (!mime.is_empty()).then_some(mime)
}

fn decode_data_uri(rest: &str) -> io::Result<Vec<u8>> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "malformed data URI"))?;

    if header.ends_with(";base64") {
        STANDARD
            .decode(payload.trim())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

/// Embed every `src="..."` and `url(...)` reference found in an HTML string
pub fn embed_html_assets(
    html: &str,
    resolver: &AssetResolver,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    static SRC_RE: OnceLock<Regex> = OnceLock::new();
    static URL_RE: OnceLock<Regex> = OnceLock::new();

    let src_re = SRC_RE.get_or_init(|| Regex::new(r#"src="([^"]*)""#).unwrap());
    let url_re =
        URL_RE.get_or_init(|| Regex::new(r#"url\((?:'([^']*)'|"([^"]*)"|([^'")\s]+))\)"#).unwrap());

    let html = src_re.replace_all(html, |cap: &Captures<'_>| {
        let src = unescape_attr(&cap[1]);
        format!("src=\"{}\"", escape_html(&resolver.resolve(&src, diagnostics)))
    });

    url_re
        .replace_all(&html, |cap: &Captures<'_>| {
            let src = cap
                .get(1)
                .or_else(|| cap.get(2))
                .or_else(|| cap.get(3))
                .map(|m| unescape_attr(m.as_str()))
                .unwrap_or_default();
            format!("url('{}')", resolver.resolve(&src, diagnostics))
        })
        .into_owned()
}

fn unescape_attr(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
