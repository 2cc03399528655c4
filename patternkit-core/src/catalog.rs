//! Catalog assembly: sorted listings and fully compiled entries per topic.

use crate::config::{Config, MalformedPolicy};
use crate::document::{CompileError, DocumentCompiler};
use crate::frontmatter::{parse_frontmatter, FrontmatterError};
use crate::markdown::highlight::SyntectHighlighter;
use crate::models::{
    DataStructureFrontmatter, Entry, PatternFrontmatter, Summary, Topic, TopicFrontmatter,
};
use crate::snippets::SnippetLoader;
use crate::store::{ContentStore, StoreError};
use deunicode::deunicode;
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Malformed front matter in '{slug}': {source}")]
    Malformed {
        slug: String,
        #[source]
        source: FrontmatterError,
    },

    #[error("Failed to compile '{slug}': {source}")]
    Compile {
        slug: String,
        #[source]
        source: CompileError,
    },

    #[error("Entry read task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::Store(StoreError::NotFound { .. }))
    }
}

/// Read surface over the content store
#[derive(Debug, Clone)]
pub struct Catalog {
    store: ContentStore,
    policy: MalformedPolicy,
    snippets: SnippetLoader,
    compiler: DocumentCompiler,
}

impl Catalog {
    pub fn new(store: ContentStore) -> Self {
        Self {
            store,
            policy: MalformedPolicy::default(),
            snippets: SnippetLoader::default(),
            compiler: DocumentCompiler::new(),
        }
    }

    /// Build a catalog wired the way the configuration describes
    pub fn from_config(config: &Config) -> Self {
        let store = ContentStore::new(config.content_root(), config.extension.clone());
        let highlighter = Arc::new(SyntectHighlighter::new(config.highlight.theme.clone()));

        Self::new(store)
            .with_policy(config.catalog.on_malformed)
            .with_snippets(SnippetLoader::new(config.snippets_root()))
            .with_compiler(DocumentCompiler::with_highlighter(highlighter))
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_snippets(mut self, snippets: SnippetLoader) -> Self {
        self.snippets = snippets;
        self
    }

    pub fn with_compiler(mut self, compiler: DocumentCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    pub async fn list_slugs(&self, topic: Topic) -> Result<Vec<String>, CatalogError> {
        Ok(self.store.list_slugs(topic).await?)
    }

    /// All summaries of `F::TOPIC`, ordered by title.
    pub async fn summaries<F: TopicFrontmatter>(&self) -> Result<Vec<Summary<F>>, CatalogError> {
        let topic = F::TOPIC;
        let slugs = self.list_slugs(topic).await?;
        tracing::debug!("Reading {} {} entries", slugs.len(), topic);

        let mut reads = JoinSet::new();
        for (index, slug) in slugs.into_iter().enumerate() {
            let store = self.store.clone();
            reads.spawn(async move {
                let raw = store.read_entry(topic, &slug).await;
                (index, slug, raw)
            });
        }

        let mut raw_entries = Vec::with_capacity(reads.len());
        while let Some(result) = reads.join_next().await {
            raw_entries.push(result?);
        }

        let summaries = assemble_summaries::<F>(raw_entries, self.policy)?;
        tracing::info!("Listed {} {} entries", summaries.len(), topic);

        Ok(summaries)
    }

    /// The fully compiled entry for `slug`.
    pub async fn get_by_slug<F: TopicFrontmatter>(&self, slug: &str) -> Result<Entry<F>, CatalogError> {
        let topic = F::TOPIC;
        let raw = self.store.read_entry(topic, slug).await?;

        let (frontmatter, body) =
            parse_frontmatter::<F>(&raw).map_err(|source| CatalogError::Malformed {
                slug: slug.to_string(),
                source,
            })?;
        warn_on_slug_mismatch(topic, slug, &frontmatter);

        let document = self
            .compiler
            .compile(&body, &frontmatter)
            .map_err(|source| CatalogError::Compile {
                slug: slug.to_string(),
                source,
            })?;

        let snippets = self.snippets.load(frontmatter.snippets()).await;

        Ok(Entry {
            slug: slug.to_string(),
            frontmatter,
            document,
            snippets,
        })
    }

    pub async fn pattern_summaries(&self) -> Result<Vec<Summary<PatternFrontmatter>>, CatalogError> {
        self.summaries().await
    }

    pub async fn data_structure_summaries(
        &self,
    ) -> Result<Vec<Summary<DataStructureFrontmatter>>, CatalogError> {
        self.summaries().await
    }

    pub async fn pattern(&self, slug: &str) -> Result<Entry<PatternFrontmatter>, CatalogError> {
        self.get_by_slug(slug).await
    }

    pub async fn data_structure(
        &self,
        slug: &str,
    ) -> Result<Entry<DataStructureFrontmatter>, CatalogError> {
        self.get_by_slug(slug).await
    }
}

type RawEntry = (usize, String, Result<String, StoreError>);

/// Turn reads that finished in any order into the title-sorted listing.
///
/// Reads are put back into enumeration order first, so the first malformed
/// entry under `Fail` and the order of equal titles never depend on which
/// read finished first.
fn assemble_summaries<F: TopicFrontmatter>(
    mut raw_entries: Vec<RawEntry>,
    policy: MalformedPolicy,
) -> Result<Vec<Summary<F>>, CatalogError> {
    let topic = F::TOPIC;
    raw_entries.sort_by_key(|(index, _, _)| *index);

    let mut summaries = Vec::with_capacity(raw_entries.len());
    for (_, slug, raw) in raw_entries {
        let raw = raw?;
        match parse_frontmatter::<F>(&raw) {
            Ok((frontmatter, _body)) => {
                warn_on_slug_mismatch(topic, &slug, &frontmatter);
                summaries.push(Summary { slug, frontmatter });
            }
            Err(source) => match policy {
                MalformedPolicy::Fail => return Err(CatalogError::Malformed { slug, source }),
                MalformedPolicy::Skip => {
                    tracing::warn!("Skipping malformed {} entry '{}': {}", topic, slug, source);
                }
            },
        }
    }

    summaries.sort_by(|a, b| compare_titles(a.frontmatter.title(), b.frontmatter.title()));
    Ok(summaries)
}

fn warn_on_slug_mismatch<F: TopicFrontmatter>(topic: Topic, key: &str, frontmatter: &F) {
    let declared = frontmatter.slug();
    if !declared.is_empty() && declared != key {
        tracing::warn!(
            "{} entry '{}' declares slug '{}'; using the file name",
            topic,
            key,
            declared
        );
    }
}

/// Title ordering that ignores accents and case first, then breaks ties
/// with lowercase-before-uppercase.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| deunicode(s).to_lowercase();

    folded(a)
        .cmp(&folded(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}
