//! CLI command implementations.

pub mod list;
pub mod serve;
pub mod show;
pub mod slugs;
pub mod verify;

pub use list::list_summaries;
pub use serve::serve;
pub use show::show_entry;
pub use slugs::list_slugs;
pub use verify::verify_content;

use anyhow::{Context, Result};
use patternkit_core::{Catalog, Config, SyntectHighlighter};
use patternkit_render::DocumentRenderer;
use std::path::Path;
use std::sync::Arc;

/// Load configuration (or defaults) and build the catalog it describes.
pub(crate) fn load_catalog(config_path: &Path) -> Result<(Config, Catalog)> {
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;
    let catalog = Catalog::from_config(&config);
    Ok((config, catalog))
}

pub(crate) fn renderer_for(config: &Config) -> DocumentRenderer {
    DocumentRenderer::new(Arc::new(SyntectHighlighter::new(
        config.highlight.theme.clone(),
    )))
}
