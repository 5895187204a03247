//! Built-in themes and stylesheet loading

use std::path::{Path, PathBuf};

use aksara_core::diagnostics::{codes, Diagnostic};
use tracing::warn;

/// Layout rules shared by every theme
///
/// Page size comes from the `--page-width`/`--page-height` custom
/// properties set on `:root` by the renderer.
pub const BASE_CSS: &str = r#"*,*::before,*::after{box-sizing:border-box;}
html,body{margin:0;padding:0;}
body.aksara{font-family:var(--font-body);color:var(--fg);background:var(--canvas);}
.aksara-deck{display:flex;flex-direction:column;align-items:center;gap:24px;padding:24px 0;transform-origin:top center;}
.aksara-page{position:relative;width:var(--page-width);height:var(--page-height);overflow:hidden;background:var(--paper);box-shadow:0 2px 12px rgba(0,0,0,.25);flex:none;}
.aksara-backdrop{position:absolute;top:0;left:0;width:100%;height:100%;z-index:0;pointer-events:none;}
.aksara-content{position:absolute;top:0;left:0;width:100%;height:100%;padding:var(--page-padding);z-index:1;overflow:hidden;}
.aksara-header,.aksara-footer{position:absolute;left:0;right:0;display:flex;align-items:center;gap:1em;padding:0 var(--page-padding-x);font-size:var(--running-size);color:var(--muted);z-index:4;}
.aksara-header{top:0;height:var(--running-height);}
.aksara-footer{bottom:0;height:var(--running-height);}
.aksara-item{flex:1 1 0;white-space:nowrap;overflow:hidden;text-overflow:ellipsis;}
.aksara-align-left{text-align:left;}
.aksara-align-center{text-align:center;}
.aksara-align-right{text-align:right;}
.aksara-flow{max-width:860px;margin:0 auto;padding:32px 24px;}
.aksara-sized{display:inline-block;max-width:100%;}
.notes{display:none;}
table{border-collapse:collapse;margin:.6em 0;}
th,td{border:1px solid var(--rule);padding:.3em .7em;}
pre{background:var(--code-bg);padding:.8em 1em;overflow:auto;border-radius:4px;}
code{font-family:var(--font-mono);}
blockquote{margin:.6em 0;padding:.2em 1em;border-left:4px solid var(--accent);color:var(--muted);}
a{color:var(--accent);}
.mermaid{text-align:center;}"#;

/// Navigation bar and presentation-mode visibility rules
pub const CONTROLS_CSS: &str = r#".aksara-controls{position:fixed;right:16px;bottom:16px;display:flex;align-items:center;gap:6px;padding:6px 10px;border-radius:6px;background:rgba(0,0,0,.65);color:#fff;font:13px/1 sans-serif;z-index:100;}
.aksara-controls button{background:none;border:1px solid rgba(255,255,255,.4);border-radius:4px;color:inherit;font:inherit;min-width:28px;padding:4px 6px;cursor:pointer;}
.aksara-controls button:hover{background:rgba(255,255,255,.15);}
.aksara-counter{min-width:56px;text-align:center;}
body.aksara-presentation .aksara-deck{height:100vh;justify-content:center;padding:0;}
body.aksara-presentation .aksara-page{display:none;}
body.aksara-presentation .aksara-page.active{display:block;}
@media print{.aksara-controls{display:none;}body.aksara-presentation .aksara-page{display:block;}.aksara-deck{transform:none!important;}}"#;

const DEFAULT_CSS: &str = r#":root{--font-body:"Helvetica Neue",Arial,sans-serif;--font-mono:"SFMono-Regular",Consolas,monospace;--fg:#1f2328;--muted:#57606a;--accent:#0969da;--rule:#d0d7de;--code-bg:#f6f8fa;--paper:#ffffff;--canvas:#e9ecef;--page-padding:56px 64px;--page-padding-x:64px;--running-height:40px;--running-size:12px;}
h1{font-size:2.2em;margin:.2em 0 .5em;}
h2{font-size:1.6em;margin:.6em 0 .4em;}
h3{font-size:1.25em;}
h4{font-size:1.05em;}"#;

const DARK_CSS: &str = r#":root{--font-body:"Inter","Segoe UI",sans-serif;--font-mono:"JetBrains Mono",monospace;--fg:#e6edf3;--muted:#8b949e;--accent:#58a6ff;--rule:#30363d;--code-bg:#161b22;--paper:#0d1117;--canvas:#010409;--page-padding:56px 64px;--page-padding-x:64px;--running-height:40px;--running-size:12px;}
h1,h2{color:#ffffff;}
h1{font-size:2.3em;margin:.2em 0 .5em;}
h2{font-size:1.6em;}"#;

const MINIMAL_CSS: &str = r#":root{--font-body:Georgia,"Times New Roman",serif;--font-mono:Menlo,monospace;--fg:#111111;--muted:#666666;--accent:#111111;--rule:#cccccc;--code-bg:#f4f4f4;--paper:#ffffff;--canvas:#ffffff;--page-padding:48px 56px;--page-padding-x:56px;--running-height:36px;--running-size:11px;}
.aksara-page{box-shadow:none;border:1px solid #dddddd;}
h1,h2,h3,h4{font-weight:normal;}"#;

/// A built-in colour and typography theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Minimal,
}

impl Theme {
    /// Look up a theme by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" | "" => Some(Self::Default),
            "dark" => Some(Self::Dark),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Look up a theme, falling back to [`Theme::Default`] with a `W005`
    pub fn resolve(name: &str, diagnostics: &mut Vec<Diagnostic>) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!(theme = name, "unknown theme, using default");
            diagnostics.push(
                Diagnostic::warning(format!("unknown theme '{name}', using default"))
                    .with_code(codes::STYLE)
                    .with_target(name)
                    .with_help("built-in themes are default, dark and minimal"),
            );
            Self::Default
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Dark => "dark",
            Self::Minimal => "minimal",
        }
    }

    /// Theme stylesheet
    pub fn css(&self) -> &'static str {
        match self {
            Self::Default => DEFAULT_CSS,
            Self::Dark => DARK_CSS,
            Self::Minimal => MINIMAL_CSS,
        }
    }
}

/// Read the stylesheet named by the `style` directive
///
/// Relative paths are resolved against `base`. An unreadable file yields an
/// empty stylesheet and a `W005` diagnostic.
pub fn load_stylesheet(
    style_path: &str,
    base: Option<&Path>,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    let path = Path::new(style_path);
    let path: PathBuf = match base {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    };

    match std::fs::read_to_string(&path) {
        Ok(css) => css,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read stylesheet");
            diagnostics.push(
                Diagnostic::warning(format!("cannot read stylesheet {}: {e}", path.display()))
                    .with_code(codes::STYLE)
                    .with_target(style_path),
            );
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_lookup() {
        assert_eq!(Theme::from_name("Dark"), Some(Theme::Dark));
        assert_eq!(Theme::from_name(" minimal "), Some(Theme::Minimal));
        assert_eq!(Theme::from_name(""), Some(Theme::Default));
        assert_eq!(Theme::from_name("neon"), None);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let mut diags = Vec::new();
        assert_eq!(Theme::resolve("neon", &mut diags), Theme::Default);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].has_code(codes::STYLE));
        assert_eq!(diags[0].target.as_deref(), Some("neon"));
    }

    #[test]
    fn test_every_theme_defines_page_variables() {
        for theme in [Theme::Default, Theme::Dark, Theme::Minimal] {
            assert!(theme.css().contains("--page-padding:"), "{}", theme.name());
            assert!(theme.css().contains("--paper:"), "{}", theme.name());
        }
    }

    #[test]
    fn test_load_stylesheet_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("brand.css"), "h1{color:red;}").unwrap();

        let mut diags = Vec::new();
        let css = load_stylesheet("brand.css", Some(dir.path()), &mut diags);
        assert_eq!(css, "h1{color:red;}");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_missing_stylesheet_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut diags = Vec::new();
        let css = load_stylesheet("nope.css", Some(dir.path()), &mut diags);
        assert!(css.is_empty());
        assert!(diags[0].has_code(codes::STYLE));
    }
}
