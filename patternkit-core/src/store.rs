//! Read access to the on-disk content store.
//!
//! Layout: `<root>/<topic-dir>/<slug>.<ext>`. Every call goes to the
//! filesystem; nothing is cached.

use crate::models::Topic;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No {topic} entry with slug '{slug}'")]
    NotFound { topic: Topic, slug: String },

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Content store rooted at a directory holding one folder per topic
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    extension: String,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn topic_dir(&self, topic: Topic) -> PathBuf {
        self.root.join(topic.dir_name())
    }

    pub fn entry_path(&self, topic: Topic, slug: &str) -> PathBuf {
        self.topic_dir(topic)
            .join(format!("{}.{}", slug, self.extension))
    }

    /// List entry slugs for a topic in directory order.
    ///
    /// Only regular files carrying the content extension count. A missing
    /// topic directory is an empty topic.
    pub async fn list_slugs(&self, topic: Topic) -> Result<Vec<String>, StoreError> {
        let dir = self.topic_dir(topic);
        let io_err = |source: std::io::Error| StoreError::Io {
            path: dir.clone(),
            source,
        };

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Topic directory {:?} does not exist", dir);
                return Ok(Vec::new());
            }
            Err(e) => return Err(io_err(e)),
        };

        let suffix = format!(".{}", self.extension);
        let mut slugs = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let file_type = entry.file_type().await.map_err(io_err)?;
            if !file_type.is_file() {
                continue;
            }

            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                tracing::debug!("Skipping non UTF-8 file name {:?}", entry.path());
                continue;
            };

            match name.strip_suffix(&suffix) {
                Some(slug) if !slug.is_empty() => slugs.push(slug.to_string()),
                _ => tracing::debug!("Skipping {} (not a .{} file)", name, self.extension),
            }
        }

        Ok(slugs)
    }

    /// Read the raw text of one entry.
    pub async fn read_entry(&self, topic: Topic, slug: &str) -> Result<String, StoreError> {
        let not_found = || StoreError::NotFound {
            topic,
            slug: slug.to_string(),
        };

        if !is_plain_slug(slug) {
            return Err(not_found());
        }

        let path = self.entry_path(topic, slug);
        match tokio::fs::metadata(&path).await {
            // Only regular files are entries; a directory named like one is not
            Ok(meta) if !meta.is_file() => return Err(not_found()),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
            Err(source) => return Err(StoreError::Io { path, source }),
        }

        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

/// A slug must name a file directly inside the topic directory.
fn is_plain_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.starts_with('.') && !slug.contains(['/', '\\'])
}
