//! Print the slugs stored for a topic.

use super::load_catalog;
use anyhow::{Context, Result};
use patternkit_core::Topic;
use std::path::Path;

pub async fn list_slugs(config_path: &Path, topic: Topic) -> Result<()> {
    let (_config, catalog) = load_catalog(config_path)?;
    let slugs = catalog
        .list_slugs(topic)
        .await
        .with_context(|| format!("Failed to list {} entries", topic))?;

    for slug in slugs {
        println!("{}", slug);
    }

    Ok(())
}
