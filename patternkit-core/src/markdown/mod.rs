//! Markdown rendering for the prose between component invocations.

pub mod highlight;

use crate::slug::slugify;
use highlight::{HighlightTransformer, Highlighter, SyntectHighlighter};
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::sync::Arc;

/// Markdown processor with heading ids and highlighted code fences
#[derive(Clone)]
pub struct MarkdownProcessor {
    options: Options,
    highlighter: Arc<dyn Highlighter>,
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        Self::with_highlighter(Arc::new(SyntectHighlighter::default()))
    }

    pub fn with_highlighter(highlighter: Arc<dyn Highlighter>) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            options,
            highlighter,
        }
    }

    pub fn highlighter(&self) -> Arc<dyn Highlighter> {
        Arc::clone(&self.highlighter)
    }

    /// Convert markdown to HTML
    pub fn convert(&self, markdown: &str) -> String {
        let events: Vec<Event> = Parser::new_ext(markdown, self.options).collect();

        let events = attach_heading_ids(events);

        let transformer = HighlightTransformer::new(self.highlighter.as_ref());
        let events = transformer.transform(events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MarkdownProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownProcessor")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Give every heading without an explicit `{#id}` a slug of its text
fn attach_heading_ids(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut ids = collect_heading_ids(&events).into_iter();
    let mut result = Vec::with_capacity(events.len());

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let generated = ids.next();
                let id = id.or_else(|| {
                    generated
                        .filter(|s| !s.is_empty())
                        .map(|s| CowStr::Boxed(s.into_boxed_str()))
                });
                result.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }
            other => result.push(other),
        }
    }

    result
}

fn collect_heading_ids(events: &[Event]) -> Vec<String> {
    let mut ids = Vec::new();
    let mut current: Option<String> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { .. }) => current = Some(String::new()),
            Event::Text(text) | Event::Code(text) => {
                if let Some(title) = current.as_mut() {
                    title.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(title) = current.take() {
                    ids.push(slugify(&title));
                }
            }
            _ => {}
        }
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use highlight::HighlightError;

    struct RejectAll;

    impl Highlighter for RejectAll {
        fn highlight(&self, _code: &str, lang: &str) -> Result<String, HighlightError> {
            Err(HighlightError::UnsupportedLanguage(lang.to_string()))
        }
    }

    #[test]
    fn test_basic_markdown() {
        let processor = MarkdownProcessor::new();
        let html = processor.convert("# Hola Mundo\n\nEsto es una **prueba**.");
        assert!(html.contains("<h1 id=\"hola-mundo\">"));
        assert!(html.contains("<strong>prueba</strong>"));
    }

    #[test]
    fn test_explicit_heading_id_wins() {
        let processor = MarkdownProcessor::new();
        let html = processor.convert("## Ejemplos {#ejemplos-js}\n");
        assert!(html.contains("id=\"ejemplos-js\""));
    }

    #[test]
    fn test_tables() {
        let processor = MarkdownProcessor::new();
        let md = r#"
| Operación | Costo |
|-----------|-------|
| push      | O(1)  |
"#;
        let html = processor.convert(md);
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>Operación</th>"));
    }

    #[test]
    fn test_code_blocks_are_highlighted() {
        let processor = MarkdownProcessor::new();
        let html = processor.convert("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre"));
        assert!(html.contains("<span"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_code_blocks_fall_back_when_highlighter_fails() {
        let processor = MarkdownProcessor::with_highlighter(Arc::new(RejectAll));
        let html = processor.convert("```ts\nconst a = 1 < 2;\n```");
        assert!(html.contains("<pre><code class=\"language-ts\">const a = 1 &lt; 2;\n</code></pre>"));
    }
}
