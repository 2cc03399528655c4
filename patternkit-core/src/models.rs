//! Content model structs for topics, front matter, summaries and entries.

use crate::document::{CodeSample, Document};
use crate::lenient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Content category an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    Pattern,
    DataStructure,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::Pattern, Topic::DataStructure];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Pattern => "pattern",
            Topic::DataStructure => "data-structure",
        }
    }

    /// Directory under the content root holding this topic's entries
    pub fn dir_name(&self) -> &'static str {
        match self {
            Topic::Pattern => "patterns",
            Topic::DataStructure => "data-structures",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pattern" | "patterns" => Ok(Topic::Pattern),
            "data-structure" | "data-structures" | "data_structure" => Ok(Topic::DataStructure),
            other => Err(format!("unknown topic '{}'", other)),
        }
    }
}

/// External link listed under an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Reference {
    #[serde(default, deserialize_with = "lenient::text")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub url: String,
}

/// Pointer to a code example file, relative to the snippets root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Snippet {
    #[serde(default, deserialize_with = "lenient::text")]
    pub lang: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub file: String,
}

/// Diagram assets for a pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Diagram {
    #[serde(
        rename = "static",
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub still: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub animated: Option<String>,
}

/// Front matter of a pattern article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PatternFrontmatter {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub slug: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub category: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub level: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub summary: String,

    #[serde(
        default,
        deserialize_with = "lenient::text_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,

    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub diagram: Option<Diagram>,

    #[serde(
        default,
        deserialize_with = "lenient::records",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub snippets: Vec<Snippet>,

    #[serde(
        rename = "quizId",
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub quiz_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::records",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub references: Vec<Reference>,

    /// Keys outside the schema, kept so re-serializing is lossless
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Front matter of a data-structure article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DataStructureFrontmatter {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub slug: String,

    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub kind: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub level: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub summary: String,

    #[serde(
        default,
        deserialize_with = "lenient::text_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,

    /// Operation name to cost. Values are not type-checked; see
    /// [`DataStructureFrontmatter::big_o_entries`].
    #[serde(
        rename = "bigO",
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub big_o: Option<serde_yaml::Mapping>,

    #[serde(
        default,
        deserialize_with = "lenient::records",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub snippets: Vec<Snippet>,

    #[serde(
        default,
        deserialize_with = "lenient::records",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub references: Vec<Reference>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl DataStructureFrontmatter {
    /// Complexity table in authoring order.
    ///
    /// Scalar costs are stringified; entries whose key or value is not a
    /// scalar are skipped.
    pub fn big_o_entries(&self) -> Vec<(String, String)> {
        let Some(map) = &self.big_o else {
            return Vec::new();
        };

        map.iter()
            .filter_map(|(op, cost)| Some((scalar_to_string(op)?, scalar_to_string(cost)?)))
            .collect()
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Shared surface of the per-topic front-matter records
pub trait TopicFrontmatter:
    DeserializeOwned + Serialize + Clone + fmt::Debug + Send + Sync + 'static
{
    const TOPIC: Topic;

    fn title(&self) -> &str;
    fn slug(&self) -> &str;
    fn level(&self) -> &str;
    fn summary(&self) -> &str;
    fn tags(&self) -> &[String];
    fn references(&self) -> &[Reference];
    fn snippets(&self) -> &[Snippet];

    /// `category` for patterns, `type` for data structures
    fn classification(&self) -> &str;
}

impl TopicFrontmatter for PatternFrontmatter {
    const TOPIC: Topic = Topic::Pattern;

    fn title(&self) -> &str {
        &self.title
    }
    fn slug(&self) -> &str {
        &self.slug
    }
    fn level(&self) -> &str {
        &self.level
    }
    fn summary(&self) -> &str {
        &self.summary
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
    fn references(&self) -> &[Reference] {
        &self.references
    }
    fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }
    fn classification(&self) -> &str {
        &self.category
    }
}

impl TopicFrontmatter for DataStructureFrontmatter {
    const TOPIC: Topic = Topic::DataStructure;

    fn title(&self) -> &str {
        &self.title
    }
    fn slug(&self) -> &str {
        &self.slug
    }
    fn level(&self) -> &str {
        &self.level
    }
    fn summary(&self) -> &str {
        &self.summary
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
    fn references(&self) -> &[Reference] {
        &self.references
    }
    fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }
    fn classification(&self) -> &str {
        &self.kind
    }
}

/// Listing projection of an entry (no body)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary<F> {
    pub slug: String,
    pub frontmatter: F,
}

/// A fully compiled entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry<F> {
    pub slug: String,
    pub frontmatter: F,
    pub document: Document,

    /// Code samples loaded from the files named in `frontmatter.snippets`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub snippets: Vec<CodeSample>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_conversion() {
        assert_eq!("pattern".parse::<Topic>(), Ok(Topic::Pattern));
        assert_eq!("Data-Structures".parse::<Topic>(), Ok(Topic::DataStructure));
        assert!("recipes".parse::<Topic>().is_err());
        assert_eq!(Topic::DataStructure.to_string(), "data-structure");
        assert_eq!(Topic::DataStructure.dir_name(), "data-structures");
    }

    #[test]
    fn test_big_o_entries_skip_non_scalars() {
        let fm: DataStructureFrontmatter = serde_yaml::from_str(
            r#"
title: Pila
type: lineal
bigO:
  push: O(1)
  pop: O(1)
  depth: 3
  nested:
    a: b
"#,
        )
        .unwrap();

        assert_eq!(
            fm.big_o_entries(),
            vec![
                ("push".to_string(), "O(1)".to_string()),
                ("pop".to_string(), "O(1)".to_string()),
                ("depth".to_string(), "3".to_string()),
            ]
        );
        assert_eq!(fm.classification(), "lineal");
    }

    #[test]
    fn test_pattern_frontmatter_wire_names() {
        let fm: PatternFrontmatter = serde_yaml::from_str(
            r#"
title: Observer
slug: observer
category: Comportamiento
level: intermedio
summary: Notifica cambios
quizId: quiz-observer
diagram:
  static: /img/observer.svg
"#,
        )
        .unwrap();

        assert_eq!(fm.quiz_id.as_deref(), Some("quiz-observer"));
        assert_eq!(
            fm.diagram.as_ref().and_then(|d| d.still.as_deref()),
            Some("/img/observer.svg")
        );
        assert!(fm.extra.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let fm: PatternFrontmatter =
            serde_yaml::from_str("title: Strategy\nauthor: Ana\n").unwrap();
        assert_eq!(
            fm.extra.get("author"),
            Some(&serde_yaml::Value::String("Ana".into()))
        );
    }
}
