//! Sorted summary listings.

use super::load_catalog;
use crate::payload::{self, SummaryListData};
use anyhow::{Context, Result};
use patternkit_core::{
    Catalog, DataStructureFrontmatter, PatternFrontmatter, Topic, TopicFrontmatter,
};
use std::path::Path;

pub async fn list_summaries(config_path: &Path, topic: Topic, json: bool) -> Result<()> {
    let (_config, catalog) = load_catalog(config_path)?;

    match topic {
        Topic::Pattern => print_summaries::<PatternFrontmatter>(&catalog, json).await,
        Topic::DataStructure => print_summaries::<DataStructureFrontmatter>(&catalog, json).await,
    }
}

async fn print_summaries<F: TopicFrontmatter>(catalog: &Catalog, json: bool) -> Result<()> {
    let summaries = catalog
        .summaries::<F>()
        .await
        .with_context(|| format!("Failed to list {} entries", F::TOPIC))?;

    if json {
        let payload = payload::envelope("summary.list", SummaryListData::new(summaries));
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    for summary in &summaries {
        let fm = &summary.frontmatter;
        println!(
            "{}\t{}\t{}\t{}",
            summary.slug,
            fm.title(),
            fm.classification(),
            fm.level()
        );
    }

    Ok(())
}
