//! Compiles an entry body into a renderable [`Document`].

pub mod attributes;
pub mod components;
pub mod scanner;

pub use components::{
    Badge, BadgeTone, CodeSample, CodeTabsProps, Component, ComponentKind, Cta, DualListProps,
    IntroProps, NarrativeSectionProps,
};

use crate::markdown::highlight::Highlighter;
use crate::markdown::MarkdownProcessor;
use scanner::Segment;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Unknown component <{name}> on line {line}")]
    UnknownComponent { name: String, line: usize },

    #[error("Unterminated <{name}> starting on line {line}")]
    Unterminated { name: String, line: usize },

    #[error("Invalid expression for {component}.{attribute} on line {line}: {message}")]
    InvalidExpression {
        component: String,
        attribute: String,
        line: usize,
        message: String,
    },

    #[error("Invalid parameters for <{component}> on line {line}")]
    InvalidParameters {
        component: &'static str,
        line: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Front matter cannot be used for attribute references")]
    Frontmatter(#[source] serde_yaml::Error),
}

/// One unit of compiled body content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Markdown already rendered to HTML
    Prose { html: String },
    Component(Component),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Component(component) => Some(component),
            Block::Prose { .. } => None,
        })
    }
}

/// Turns MDX-style bodies into documents
#[derive(Debug, Clone, Default)]
pub struct DocumentCompiler {
    markdown: MarkdownProcessor,
}

impl DocumentCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_highlighter(highlighter: Arc<dyn Highlighter>) -> Self {
        Self {
            markdown: MarkdownProcessor::with_highlighter(highlighter),
        }
    }

    /// Compile a body. `frontmatter` backs `{frontmatter.*}` attribute
    /// references.
    pub fn compile<F: Serialize>(
        &self,
        body: &str,
        frontmatter: &F,
    ) -> Result<Document, CompileError> {
        let frontmatter = serde_yaml::to_value(frontmatter).map_err(CompileError::Frontmatter)?;
        let mut blocks = Vec::new();

        for segment in scanner::scan(body)? {
            match segment {
                Segment::Prose(text) => {
                    if text.trim().is_empty() {
                        continue;
                    }
                    blocks.push(Block::Prose {
                        html: self.markdown.convert(&text),
                    });
                }
                Segment::Invocation(raw) => {
                    let kind = ComponentKind::resolve(&raw.name).ok_or_else(|| {
                        CompileError::UnknownComponent {
                            name: raw.name.clone(),
                            line: raw.line,
                        }
                    })?;

                    let params = attributes::parse_attributes(&raw.attributes, &frontmatter)
                        .map_err(|e| CompileError::InvalidExpression {
                            component: raw.name.clone(),
                            attribute: e.attribute,
                            line: raw.line,
                            message: e.message,
                        })?;

                    let component = Component::bind(kind, params, raw.children).map_err(
                        |source| CompileError::InvalidParameters {
                            component: kind.name(),
                            line: raw.line,
                            source,
                        },
                    )?;

                    blocks.push(Block::Component(component));
                }
            }
        }

        Ok(Document { blocks })
    }
}
