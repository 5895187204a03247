//! Positional image grammar
//!
//! `![<layer?> <t|r|b|l|x|y|w|h>:<value> ... <alt words>](<src>)`
//!
//! The first alt word may name a layer (`bg`, `fg`, `lg`, `wm`). Placement
//! tokens may appear anywhere after it. Whatever is left becomes the
//! accessible label.

use std::sync::OnceLock;

use aksara_ast::{ImageRef, Layer, Placement};
use regex::Regex;

/// Build an image reference from the raw alt text and source
pub fn parse_image(alt: &str, src: &str) -> ImageRef {
    let mut words = alt.split_whitespace().peekable();

    let layer = words.peek().and_then(|w| Layer::from_keyword(w));
    if layer.is_some() {
        words.next();
    }

    let mut placement = Placement::default();
    let mut label = Vec::new();

    for word in words {
        if !apply_token(&mut placement, word) {
            label.push(word);
        }
    }

    ImageRef {
        src: src.trim().to_string(),
        alt: label.join(" "),
        layer,
        placement,
    }
}

/// Apply a `key:value` placement token, returning false for ordinary words
fn apply_token(placement: &mut Placement, word: &str) -> bool {
    let Some((key, value)) = word.split_once(':') else {
        return false;
    };
    if value.is_empty() {
        return false;
    }

    let slot = match key {
        "t" | "y" => &mut placement.top,
        "r" => &mut placement.right,
        "b" => &mut placement.bottom,
        "l" | "x" => &mut placement.left,
        "w" => &mut placement.width,
        "h" => &mut placement.height,
        _ => return false,
    };
    *slot = Some(normalize_length(value));
    true
}

/// Bare numbers are percentages; anything else is kept as a CSS length
pub fn normalize_length(value: &str) -> String {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    let re = NUMBER_RE.get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());

    if re.is_match(value) {
        format!("{value}%")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aksara_ast::ImageMode;

    #[test]
    fn test_plain_image() {
        let img = parse_image("A red car", "car.png");
        assert_eq!(img.alt, "A red car");
        assert!(img.layer.is_none());
        assert_eq!(img.mode(), ImageMode::Inline);
    }

    #[test]
    fn test_background() {
        let img = parse_image("bg", "photo.jpg");
        assert_eq!(img.layer, Some(Layer::Background));
        assert_eq!(img.alt, "");
        assert_eq!(img.mode(), ImageMode::Backdrop);
        assert_eq!(img.z_index(), 1);
    }

    #[test]
    fn test_watermark_positioned() {
        let img = parse_image("wm t:0 l:0 w:10%", "logo.png");
        assert_eq!(img.layer, Some(Layer::Watermark));
        assert_eq!(img.placement.top.as_deref(), Some("0%"));
        assert_eq!(img.placement.left.as_deref(), Some("0%"));
        assert_eq!(img.placement.width.as_deref(), Some("10%"));
        assert_eq!(img.mode(), ImageMode::Positioned);
        assert_eq!(img.z_index(), 0);
    }

    #[test]
    fn test_legacy_xy_alias() {
        let img = parse_image("lg x:80 y:5 company logo", "logo.svg");
        assert_eq!(img.placement.left.as_deref(), Some("80%"));
        assert_eq!(img.placement.top.as_deref(), Some("5%"));
        assert_eq!(img.alt, "company logo");
    }

    #[test]
    fn test_size_only() {
        let img = parse_image("w:50% h:200px chart", "chart.png");
        assert_eq!(img.mode(), ImageMode::Sized);
        assert_eq!(img.placement.height.as_deref(), Some("200px"));
        assert_eq!(img.alt, "chart");
    }

    #[test]
    fn test_layer_keyword_only_first() {
        let img = parse_image("my bg picture", "a.png");
        assert!(img.layer.is_none());
        assert_eq!(img.alt, "my bg picture");
    }

    #[test]
    fn test_unknown_token_is_label() {
        let img = parse_image("note: q:5", "a.png");
        assert_eq!(img.alt, "note: q:5");
        assert!(img.placement.is_empty());
    }
}
