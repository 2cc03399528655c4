//! Code syntax highlighting using syntect.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};
use thiserror::Error;

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    #[error("No grammar for language '{0}'")]
    UnsupportedLanguage(String),

    #[error("Highlighting failed: {0}")]
    Render(String),
}

/// Turns source code into highlighted HTML markup.
///
/// Callers treat every error as "use the raw code instead".
pub trait Highlighter: Send + Sync {
    fn highlight(&self, code: &str, lang: &str) -> Result<String, HighlightError>;
}

/// Highlighter backed by syntect's bundled grammars and themes
#[derive(Debug, Clone)]
pub struct SyntectHighlighter {
    theme: String,
}

impl SyntectHighlighter {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
        }
    }

    fn find_syntax(&self, lang: &str) -> Option<&'static SyntaxReference> {
        let ss = syntax_set();
        let lang = lang.trim();
        if lang.is_empty() {
            return None;
        }

        ss.find_syntax_by_token(lang)
            .or_else(|| ss.find_syntax_by_extension(lang))
            .or_else(|| ss.find_syntax_by_name(lang))
            .or_else(|| grammar_alias(lang).and_then(|alias| ss.find_syntax_by_token(alias)))
    }
}

/// Bundled grammar standing in for a language syntect does not ship.
///
/// The default set has no TypeScript; the JavaScript grammar covers its
/// expression syntax and leaves type annotations unscoped.
fn grammar_alias(lang: &str) -> Option<&'static str> {
    match lang.to_ascii_lowercase().as_str() {
        "ts" | "tsx" | "typescript" | "mts" | "cts" => Some("js"),
        "jsx" | "javascriptreact" => Some("js"),
        _ => None,
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        // Clean, minimal light theme
        Self::new("InspiredGitHub")
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, lang: &str) -> Result<String, HighlightError> {
        let syntax = self
            .find_syntax(lang)
            .ok_or_else(|| HighlightError::UnsupportedLanguage(lang.to_string()))?;

        let themes = &theme_set().themes;
        let theme = themes
            .get(&self.theme)
            .or_else(|| themes.get("InspiredGitHub"))
            .or_else(|| themes.values().next())
            .ok_or_else(|| HighlightError::Render("no themes loaded".to_string()))?;

        highlighted_html_for_string(code, syntax_set(), syntax, theme)
            .map_err(|e| HighlightError::Render(e.to_string()))
    }
}

/// Markup used when a block cannot be highlighted
pub fn plain_code_html(code: &str, lang: Option<&str>) -> String {
    match lang.filter(|l| !l.is_empty()) {
        Some(lang) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            html_escape(lang),
            html_escape(code)
        ),
        None => format!("<pre><code>{}</code></pre>", html_escape(code)),
    }
}

/// Transformer for syntax highlighting fenced code blocks in prose
pub struct HighlightTransformer<'h> {
    highlighter: &'h dyn Highlighter,
}

impl<'h> HighlightTransformer<'h> {
    pub fn new(highlighter: &'h dyn Highlighter) -> Self {
        Self { highlighter }
    }

    /// Transform events, replacing fenced code blocks with highlighted HTML
    pub fn transform(&self, events: Vec<Event<'_>>) -> Vec<Event<'static>> {
        let mut result = Vec::with_capacity(events.len());
        let mut code_lang: Option<String> = None;
        let mut code_content = String::new();

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) => {
                    // Info strings may carry extra words ("rust ignore")
                    let lang = lang.split_whitespace().next().unwrap_or_default();
                    code_lang = Some(lang.to_string());
                    code_content.clear();
                }
                Event::Text(text) if code_lang.is_some() => {
                    code_content.push_str(text.as_ref());
                }
                Event::End(TagEnd::CodeBlock) if code_lang.is_some() => {
                    let lang = code_lang.take().unwrap_or_default();
                    let html = self.render_block(&code_content, &lang);
                    result.push(Event::Html(CowStr::Boxed(html.into_boxed_str())));
                }
                other => result.push(other.into_static()),
            }
        }

        result
    }

    fn render_block(&self, code: &str, lang: &str) -> String {
        if lang.is_empty() {
            return plain_code_html(code, None);
        }

        match self.highlighter.highlight(code, lang) {
            Ok(html) => html,
            Err(e) => {
                tracing::debug!("Falling back to plain code block: {}", e);
                plain_code_html(code, Some(lang))
            }
        }
    }
}

pub(crate) fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
