//! Slug generation for heading anchors and snippet labels.

use regex::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

fn hyphen_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-+").expect("valid regex"))
}

/// Convert a string to a URL-safe slug
///
/// Lowercases, turns whitespace and underscores into hyphens, drops
/// punctuation, and keeps unicode letters so Spanish headings stay
/// readable.
///
/// # Examples
///
/// ```
/// use patternkit_core::slugify;
///
/// assert_eq!(slugify("Por qué existe"), "por-qué-existe");
/// assert_eq!(slugify("Ventajas & Desventajas"), "ventajas-desventajas");
/// ```
pub fn slugify(input: &str) -> String {
    let cleaned = input
        .to_lowercase()
        .graphemes(true)
        .filter_map(|g| match g {
            " " | "_" | "\t" | "\n" | "\r\n" => Some("-"),
            _ => {
                let c = g.chars().next()?;
                (c.is_alphanumeric() || c == '-').then_some(g)
            }
        })
        .collect::<String>();

    hyphen_run()
        .replace_all(&cleaned, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Coordinación centralizada"), "coordinación-centralizada");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(slugify("¿Cuándo usarlo?"), "cuándo-usarlo");
        assert_eq!(slugify("C++ Programming"), "c-programming");
        assert_eq!(slugify("Node.js Tips"), "nodejs-tips");
    }

    #[test]
    fn test_multiple_separators() {
        assert_eq!(slugify("Hello    World"), "hello-world");
        assert_eq!(slugify("rust_lang  basics"), "rust-lang-basics");
        assert_eq!(slugify("  -Leading Hyphen- "), "leading-hyphen");
    }

    #[test]
    fn test_empty_and_special_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("   "), "");
    }
}
