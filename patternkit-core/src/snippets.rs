//! Loads the code files an entry's front matter points at.

use crate::document::CodeSample;
use crate::models::Snippet;
use std::path::{Component, Path, PathBuf};

/// Reads snippet files from a root directory
#[derive(Debug, Clone, Default)]
pub struct SnippetLoader {
    root: Option<PathBuf>,
}

impl SnippetLoader {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Load every readable snippet, in front-matter order.
    ///
    /// A file that cannot be read is skipped with a warning; the remaining
    /// samples still load.
    pub async fn load(&self, snippets: &[Snippet]) -> Vec<CodeSample> {
        let Some(root) = self.root.as_deref() else {
            if !snippets.is_empty() {
                tracing::debug!("No snippets root configured; ignoring {} snippets", snippets.len());
            }
            return Vec::new();
        };

        let mut samples = Vec::with_capacity(snippets.len());
        for snippet in snippets {
            let Some(path) = resolve(root, &snippet.file) else {
                tracing::warn!("Refusing snippet path outside the snippets root: {}", snippet.file);
                continue;
            };

            match tokio::fs::read_to_string(&path).await {
                Ok(code) => samples.push(CodeSample::new(snippet.lang.clone(), code)),
                Err(e) => tracing::warn!("Skipping snippet {:?}: {}", path, e),
            }
        }

        samples
    }
}

/// Join a relative snippet path onto the root, rejecting anything that could
/// escape it.
fn resolve(root: &Path, file: &str) -> Option<PathBuf> {
    let relative = Path::new(file);
    if file.is_empty() || relative.is_absolute() {
        return None;
    }

    let plain = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

    plain.then(|| root.join(relative))
}
