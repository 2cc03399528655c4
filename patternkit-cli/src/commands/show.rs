//! Fetch a single entry in structured form.

use super::{load_catalog, renderer_for};
use crate::payload::{self, EntryData};
use crate::ShowFormat;
use anyhow::{Context, Result};
use patternkit_core::{
    render_with_frontmatter, Catalog, DataStructureFrontmatter, Entry, PatternFrontmatter, Topic,
    TopicFrontmatter,
};
use std::path::Path;

/// Fetch an entry and print it in the requested format.
pub async fn show_entry(
    config_path: &Path,
    topic: Topic,
    slug: &str,
    format: ShowFormat,
) -> Result<()> {
    let (config, catalog) = load_catalog(config_path)?;

    match format {
        ShowFormat::Raw => {
            let raw = catalog
                .store()
                .read_entry(topic, slug)
                .await
                .with_context(|| format!("Failed to read {} '{}'", topic, slug))?;
            print!("{}", raw);
        }
        ShowFormat::Frontmatter => {
            let block = match topic {
                Topic::Pattern => frontmatter_block::<PatternFrontmatter>(&catalog, slug).await?,
                Topic::DataStructure => {
                    frontmatter_block::<DataStructureFrontmatter>(&catalog, slug).await?
                }
            };
            print!("{}", block);
        }
        ShowFormat::Json | ShowFormat::Html => {
            let json = matches!(format, ShowFormat::Json);
            let renderer = renderer_for(&config);
            let output = match topic {
                Topic::Pattern => {
                    let entry = load_entry::<PatternFrontmatter>(&catalog, slug).await?;
                    format_entry(entry, &renderer, json).await?
                }
                Topic::DataStructure => {
                    let entry = load_entry::<DataStructureFrontmatter>(&catalog, slug).await?;
                    format_entry(entry, &renderer, json).await?
                }
            };
            println!("{}", output);
        }
    }

    Ok(())
}

async fn load_entry<F: TopicFrontmatter>(catalog: &Catalog, slug: &str) -> Result<Entry<F>> {
    catalog
        .get_by_slug::<F>(slug)
        .await
        .with_context(|| format!("Failed to load {} '{}'", F::TOPIC, slug))
}

async fn frontmatter_block<F: TopicFrontmatter>(catalog: &Catalog, slug: &str) -> Result<String> {
    let entry = load_entry::<F>(catalog, slug).await?;
    render_with_frontmatter(&entry.frontmatter, "").context("Failed to serialize front matter")
}

async fn format_entry<F: TopicFrontmatter>(
    entry: Entry<F>,
    renderer: &patternkit_render::DocumentRenderer,
    json: bool,
) -> Result<String> {
    let html = renderer
        .render(&entry.document)
        .await
        .context("Failed to render document")?;

    if !json {
        return Ok(html);
    }

    let payload = payload::envelope("entry.full", EntryData::new(entry, html));
    Ok(serde_json::to_string_pretty(&payload)?)
}
