//! Frontmatter parsing from MDX content files.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Missing frontmatter block")]
    Missing,

    #[error("Frontmatter is not a mapping")]
    NotAMapping,

    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)\A\x{feff}?---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)(.*)\z")
            .expect("valid regex")
    })
}

/// Split raw content into the YAML text and the verbatim body.
pub fn split_frontmatter(content: &str) -> Result<(&str, &str), FrontmatterError> {
    let captures = frontmatter_regex()
        .captures(content)
        .ok_or(FrontmatterError::Missing)?;

    let yaml = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let body = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
    Ok((yaml, body))
}

/// Parse the metadata block as an untyped mapping.
pub fn parse_metadata(content: &str) -> Result<(serde_yaml::Mapping, String), FrontmatterError> {
    let (yaml, body) = split_frontmatter(content)?;

    match serde_yaml::from_str::<serde_yaml::Value>(yaml)? {
        serde_yaml::Value::Mapping(map) => Ok((map, body.to_string())),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

/// Parse frontmatter from MDX content
///
/// Returns a tuple of (frontmatter, body). Only a missing block or one that
/// is not a mapping is rejected; the topic records coerce or drop field
/// values of unexpected shape and default absent fields.
///
/// # Example
///
/// ```
/// use patternkit_core::{parse_frontmatter, PatternFrontmatter};
///
/// let content = "---\ntitle: Singleton\nslug: singleton\n---\n<Intro title=\"Singleton\" />\n";
///
/// let (fm, body): (PatternFrontmatter, String) = parse_frontmatter(content).unwrap();
/// assert_eq!(fm.title, "Singleton");
/// assert!(body.starts_with("<Intro"));
/// ```
pub fn parse_frontmatter<F: DeserializeOwned>(
    content: &str,
) -> Result<(F, String), FrontmatterError> {
    let (map, body) = parse_metadata(content)?;
    let frontmatter = serde_yaml::from_value(serde_yaml::Value::Mapping(map))?;
    Ok((frontmatter, body))
}

/// Serialize frontmatter and body back into a content file.
pub fn render_with_frontmatter<F: Serialize>(
    frontmatter: &F,
    body: &str,
) -> Result<String, FrontmatterError> {
    let yaml = serde_yaml::to_string(frontmatter)?;
    Ok(format!("---\n{}---\n{}", yaml, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataStructureFrontmatter, PatternFrontmatter};

    #[test]
    fn test_parse_valid_frontmatter() {
        let content = r#"---
title: Singleton
slug: singleton
category: Creacional
level: básico
summary: Una única instancia
---

<PatternIntro title="Singleton" />

Texto."#;

        let (fm, body): (PatternFrontmatter, _) = parse_frontmatter(content).unwrap();
        assert_eq!(fm.title, "Singleton");
        assert_eq!(fm.category, "Creacional");
        assert_eq!(fm.level, "básico");
        assert!(body.contains("<PatternIntro"));
        assert!(body.ends_with("Texto."));
    }

    #[test]
    fn test_body_is_verbatim() {
        let content = "---\ntitle: A\n---\n\n  indented\n\n";
        let (_, body): (PatternFrontmatter, _) = parse_frontmatter(content).unwrap();
        assert_eq!(body, "\n  indented\n\n");
    }

    #[test]
    fn test_closing_delimiter_at_end_of_file() {
        let content = "---\ntitle: Only Meta\n---";
        let (fm, body): (PatternFrontmatter, _) = parse_frontmatter(content).unwrap();
        assert_eq!(fm.title, "Only Meta");
        assert_eq!(body, "");
    }

    #[test]
    fn test_missing_block() {
        let content = "# Just Content\n\nNo frontmatter here.";
        let result: Result<(PatternFrontmatter, String), _> = parse_frontmatter(content);
        assert!(matches!(result, Err(FrontmatterError::Missing)));
    }

    #[test]
    fn test_scalar_block_is_not_a_mapping() {
        let content = "---\njust a string\n---\nBody";
        assert!(matches!(
            parse_metadata(content),
            Err(FrontmatterError::NotAMapping)
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        let content = r#"---
title: Test
invalid yaml: [unclosed
---

Content."#;

        assert!(matches!(
            parse_metadata(content),
            Err(FrontmatterError::YamlError(_))
        ));
    }

    #[test]
    fn test_absent_fields_default() {
        let content = "---\nsummary: sin título\n---\nBody";
        let (fm, _): (DataStructureFrontmatter, _) = parse_frontmatter(content).unwrap();
        assert_eq!(fm.title, "");
        assert!(fm.big_o.is_none());
        assert!(fm.tags.is_empty());
    }

    #[test]
    fn test_scalar_fields_are_coerced() {
        let content = "---\ntitle: 1984\nlevel: 2\ntags: 5\nquizId: 7\n---\nBody";
        let (fm, _): (PatternFrontmatter, _) = parse_frontmatter(content).unwrap();
        assert_eq!(fm.title, "1984");
        assert_eq!(fm.level, "2");
        assert_eq!(fm.tags, vec!["5".to_string()]);
        assert_eq!(fm.quiz_id.as_deref(), Some("7"));
    }

    #[test]
    fn test_misshapen_fields_are_dropped() {
        let content = r#"---
title: [Cola, Pila]
type: lineal
tags: [fifo, {nested: true}]
bigO: O(1)
snippets:
  - lang: ts
    file: queue/js.ts
  - just-a-string
references: https://example.com
---
Body"#;
        let (fm, _): (DataStructureFrontmatter, _) = parse_frontmatter(content).unwrap();
        assert_eq!(fm.title, "");
        assert_eq!(fm.kind, "lineal");
        assert_eq!(fm.tags, vec!["fifo".to_string()]);
        assert!(fm.big_o.is_none());
        assert_eq!(fm.snippets.len(), 1);
        assert_eq!(fm.snippets[0].file, "queue/js.ts");
        assert!(fm.references.is_empty());
    }

    #[test]
    fn test_coerced_fields_round_trip() {
        let content = "---\ntitle: 1984\nlevel: 2\n---\nBody\n";
        let (fm, body): (PatternFrontmatter, _) = parse_frontmatter(content).unwrap();
        let rendered = render_with_frontmatter(&fm, &body).unwrap();
        let (fm_again, body_again): (PatternFrontmatter, _) = parse_frontmatter(&rendered).unwrap();
        assert_eq!(fm, fm_again);
        assert_eq!(body, body_again);
    }

    #[test]
    fn test_list_block_is_not_a_mapping() {
        let content = "---\n- title: A\n---\nBody";
        let result: Result<(PatternFrontmatter, String), _> = parse_frontmatter(content);
        assert!(matches!(result, Err(FrontmatterError::NotAMapping)));
    }

    #[test]
    fn test_round_trip_on_metadata_boundary() {
        let content = r#"---
title: Árbol binario
slug: arbol-binario
type: jerárquica
level: intermedio
summary: Nodos con hasta dos hijos
tags:
  - árboles
bigO:
  search: O(log n)
  insert: O(log n)
references:
  - label: Wikipedia
    url: https://es.wikipedia.org/wiki/Árbol_binario
custom: kept
---
<DualList leftTitle="Ventajas" leftItems={["Búsqueda rápida"]} rightTitle="Desventajas" rightItems={[]} />
"#;

        let (fm, body): (DataStructureFrontmatter, _) = parse_frontmatter(content).unwrap();
        let rendered = render_with_frontmatter(&fm, &body).unwrap();
        let (fm_again, body_again): (DataStructureFrontmatter, _) =
            parse_frontmatter(&rendered).unwrap();

        assert_eq!(fm, fm_again);
        assert_eq!(body, body_again);
        assert_eq!(
            fm_again.big_o_entries().first(),
            Some(&("search".to_string(), "O(log n)".to_string()))
        );
    }
}
