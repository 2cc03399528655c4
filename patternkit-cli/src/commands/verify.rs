//! Verify content health and emit diagnostics.

use super::load_catalog;
use anyhow::{bail, Result};
use patternkit_core::{
    Catalog, CatalogError, ContentStore, DataStructureFrontmatter, PatternFrontmatter, Topic,
    TopicFrontmatter,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub message: String,
}

#[derive(Serialize)]
struct VerificationSummary<'a> {
    entries: usize,
    errors: usize,
    warnings: usize,
    diagnostics: &'a [Diagnostic],
}

/// Parse and compile every entry of every topic and surface diagnostics.
pub async fn verify_content(config_path: &Path, json: bool) -> Result<()> {
    let (_config, catalog) = load_catalog(config_path)?;
    let mut diagnostics = Vec::new();

    let mut entries = 0;
    for topic in Topic::ALL {
        entries += match topic {
            Topic::Pattern => {
                verify_topic::<PatternFrontmatter>(&catalog, &mut diagnostics).await?
            }
            Topic::DataStructure => {
                verify_topic::<DataStructureFrontmatter>(&catalog, &mut diagnostics).await?
            }
        };
    }

    diagnostics.extend(stray_files(catalog.store()));

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics.len() - errors;

    let summary = VerificationSummary {
        entries,
        errors,
        warnings,
        diagnostics: &diagnostics,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Verification complete: {} entries, {} errors, {} warnings",
            entries, errors, warnings
        );
        for diag in &diagnostics {
            let target = match (&diag.topic, &diag.slug, &diag.path) {
                (Some(topic), Some(slug), _) => format!(" [{}/{}]", topic, slug),
                (_, _, Some(path)) => format!(" ({})", path.display()),
                _ => String::new(),
            };
            println!("- {:?} {}{}: {}", diag.severity, diag.code, target, diag.message);
        }
    }

    if errors > 0 {
        bail!("{} entries failed verification", errors);
    }

    Ok(())
}

/// Compile every entry of one topic, returning how many were checked.
async fn verify_topic<F: TopicFrontmatter>(
    catalog: &Catalog,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<usize> {
    let topic = F::TOPIC;
    let slugs = catalog.list_slugs(topic).await?;

    for slug in &slugs {
        let entry_diag = |severity, code, message: String| Diagnostic {
            severity,
            code,
            topic: Some(topic),
            slug: Some(slug.clone()),
            path: None,
            message,
        };

        match catalog.get_by_slug::<F>(slug).await {
            Ok(entry) => {
                let declared = entry.frontmatter.slug();
                if !declared.is_empty() && declared != slug.as_str() {
                    diagnostics.push(entry_diag(
                        Severity::Warning,
                        "slug-mismatch",
                        format!("front matter declares slug '{}'", declared),
                    ));
                }
                if entry.frontmatter.title().is_empty() {
                    diagnostics.push(entry_diag(
                        Severity::Warning,
                        "missing-title",
                        "entry has no title".to_string(),
                    ));
                }
            }
            Err(err @ CatalogError::Malformed { .. }) => {
                diagnostics.push(entry_diag(Severity::Error, "malformed", err.to_string()));
            }
            Err(err @ CatalogError::Compile { .. }) => {
                diagnostics.push(entry_diag(Severity::Error, "compile", err.to_string()));
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(slugs.len())
}

/// Files under the content root that can never be loaded as entries.
fn stray_files(store: &ContentStore) -> Vec<Diagnostic> {
    let root = store.root();
    let suffix = format!(".{}", store.extension());
    let topic_dirs: Vec<&str> = Topic::ALL.iter().map(|t| t.dir_name()).collect();

    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let relative = e.path().strip_prefix(root).ok()?;
            let parts: Vec<_> = relative.iter().filter_map(|p| p.to_str()).collect();
            let name = e.file_name().to_string_lossy();

            let reason = match parts.as_slice() {
                [dir, _] if topic_dirs.contains(dir) => {
                    if name.ends_with(&suffix) {
                        return None;
                    }
                    format!("not a {} file", suffix)
                }
                [dir, ..] if topic_dirs.contains(dir) => {
                    "nested below a topic directory".to_string()
                }
                _ => "outside any topic directory".to_string(),
            };

            Some(Diagnostic {
                severity: Severity::Warning,
                code: "stray-file",
                topic: None,
                slug: None,
                path: Some(relative.to_path_buf()),
                message: reason,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn stray_files_are_reported() {
        let dir = tempdir().unwrap();
        let patterns = dir.path().join("patterns");
        fs::create_dir_all(patterns.join("drafts")).unwrap();
        fs::write(patterns.join("singleton.mdx"), "---\ntitle: S\n---\n").unwrap();
        fs::write(patterns.join("notes.txt"), "x").unwrap();
        fs::write(patterns.join("drafts/old.mdx"), "x").unwrap();
        fs::write(dir.path().join("README.md"), "x").unwrap();

        let store = ContentStore::new(dir.path(), "mdx");
        let mut found: Vec<_> = stray_files(&store)
            .into_iter()
            .map(|d| (d.path.unwrap(), d.message))
            .collect();
        found.sort();

        assert_eq!(found.len(), 3);
        assert_eq!(found[0].0, PathBuf::from("README.md"));
        assert_eq!(found[0].1, "outside any topic directory");
        assert_eq!(found[1].0, PathBuf::from("patterns/drafts/old.mdx"));
        assert_eq!(found[2].1, "not a .mdx file");
    }
}
