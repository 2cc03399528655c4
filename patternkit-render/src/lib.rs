//! # patternkit-render
//!
//! HTML rendering for compiled PatternKit documents.
//!
//! Static components go through Askama templates; code tabs are driven by
//! the [`CodeTabs`] state machine so that highlighting runs concurrently
//! and degrades per sample.

pub mod code_tabs;
pub mod components;

pub use code_tabs::{
    Clipboard, ClipboardError, CodeTabs, CopyState, Rendition, SampleState, ScheduledReset,
    COPY_RESET_DELAY,
};

use askama::Template;
use components::{
    DualListTemplate, EditorialExampleTemplate, IntroTemplate, NarrativeSectionTemplate,
};
use patternkit_core::{
    Block, Component, Document, Highlighter, MarkdownProcessor, NarrativeSectionProps,
    SyntectHighlighter,
};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

/// Renders documents to HTML fragments
#[derive(Clone)]
pub struct DocumentRenderer {
    highlighter: Arc<dyn Highlighter>,
    markdown: MarkdownProcessor,
}

impl DocumentRenderer {
    pub fn new(highlighter: Arc<dyn Highlighter>) -> Self {
        Self {
            markdown: MarkdownProcessor::with_highlighter(Arc::clone(&highlighter)),
            highlighter,
        }
    }

    pub async fn render(&self, document: &Document) -> Result<String, RenderError> {
        let mut parts = Vec::with_capacity(document.blocks.len());

        for block in &document.blocks {
            let html = match block {
                Block::Prose { html } => html.clone(),
                Block::Component(component) => self.render_component(component).await?,
            };
            if !html.is_empty() {
                parts.push(html);
            }
        }

        Ok(parts.join("\n"))
    }

    pub async fn render_component(&self, component: &Component) -> Result<String, RenderError> {
        match component {
            Component::CodeTabs(props) => {
                let mut tabs = CodeTabs::new(props.samples.clone());
                tabs.highlight_all(Arc::clone(&self.highlighter)).await;
                tabs.render()
            }
            Component::EditorialExample => self.render_editorial_example(),
            Component::Intro(props) => Ok(IntroTemplate::new(props).render()?),
            Component::NarrativeSection(props) => self.render_narrative_section(props),
            Component::DualList(props) => Ok(DualListTemplate::new(props).render()?),
        }
    }

    fn render_narrative_section(&self, props: &NarrativeSectionProps) -> Result<String, RenderError> {
        let aside_html = props
            .aside
            .as_deref()
            .filter(|aside| !aside.trim().is_empty())
            .map(|aside| self.markdown.convert(aside))
            .unwrap_or_default();

        let template = NarrativeSectionTemplate { props, aside_html };
        Ok(template.render()?)
    }

    fn render_editorial_example(&self) -> Result<String, RenderError> {
        let mut parts = Vec::new();
        for component in Component::editorial_example() {
            let html = match &component {
                Component::Intro(props) => IntroTemplate::new(props).render()?,
                Component::NarrativeSection(props) => self.render_narrative_section(props)?,
                Component::DualList(props) => DualListTemplate::new(props).render()?,
                Component::EditorialExample | Component::CodeTabs(_) => continue,
            };
            parts.push(html);
        }

        Ok(EditorialExampleTemplate { parts }.render()?)
    }
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self::new(Arc::new(SyntectHighlighter::default()))
    }
}

impl std::fmt::Debug for DocumentRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentRenderer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patternkit_core::{CodeSample, CodeTabsProps, DocumentCompiler, PatternFrontmatter};

    #[tokio::test]
    async fn renders_blocks_in_order() {
        let body = "Antes.\n\n<NarrativeSection label=\"Nota\" title=\"Detalle\">\nVer **abajo**.\n</NarrativeSection>\n\nDespués.\n";
        let document = DocumentCompiler::new()
            .compile(body, &PatternFrontmatter::default())
            .unwrap();

        let html = DocumentRenderer::default().render(&document).await.unwrap();
        let before = html.find("<p>Antes.</p>").unwrap();
        let section = html.find("<h3>Detalle</h3>").unwrap();
        let after = html.find("<p>Después.</p>").unwrap();
        assert!(before < section && section < after);
        assert!(html.contains("<strong>abajo</strong>"));
    }

    #[tokio::test]
    async fn editorial_example_expands() {
        let html = DocumentRenderer::default()
            .render_component(&Component::EditorialExample)
            .await
            .unwrap();

        assert!(html.contains("<h1>Singleton</h1>"));
        assert!(html.contains("Coordinación centralizada"));
        assert!(html.contains("Desventajas"));
    }

    #[tokio::test]
    async fn empty_code_tabs_render_nothing() {
        let document = Document {
            blocks: vec![Block::Component(Component::CodeTabs(CodeTabsProps::default()))],
        };
        let html = DocumentRenderer::default().render(&document).await.unwrap();
        assert_eq!(html, "");
    }

    #[tokio::test]
    async fn code_tabs_with_unknown_language_fall_back() {
        let component = Component::CodeTabs(CodeTabsProps {
            samples: vec![
                CodeSample::new("rust", "fn main() {}\n"),
                CodeSample::new("xx-unknown", "a < b"),
            ],
        });
        let html = DocumentRenderer::default()
            .render_component(&component)
            .await
            .unwrap();

        assert!(html.contains("<span"));
        assert!(html.contains("<pre><code class=\"language-xx-unknown\">a &lt; b</code></pre>"));
    }
}
