//! # patternkit-core
//!
//! Core library for the PatternKit documentation site.
//!
//! This crate reads pattern and data-structure articles from the content
//! store, splits their front matter, compiles their MDX bodies into
//! [`Document`]s bound to a closed component set, and assembles sorted
//! catalog listings.

pub mod catalog;
pub mod config;
pub mod document;
pub mod frontmatter;
mod lenient;
pub mod markdown;
pub mod models;
pub mod slug;
pub mod snippets;
pub mod store;

pub use catalog::{compare_titles, Catalog, CatalogError};
pub use config::{Config, MalformedPolicy};
pub use document::{
    Badge, BadgeTone, Block, CodeSample, CodeTabsProps, CompileError, Component, ComponentKind,
    Cta, Document, DocumentCompiler, DualListProps, IntroProps, NarrativeSectionProps,
};
pub use frontmatter::{
    parse_frontmatter, parse_metadata, render_with_frontmatter, split_frontmatter, FrontmatterError,
};
pub use markdown::highlight::{HighlightError, Highlighter, SyntectHighlighter};
pub use markdown::MarkdownProcessor;
pub use models::{
    DataStructureFrontmatter, Diagram, Entry, PatternFrontmatter, Reference, Snippet, Summary,
    Topic, TopicFrontmatter,
};
pub use slug::slugify;
pub use snippets::SnippetLoader;
pub use store::{ContentStore, StoreError};
