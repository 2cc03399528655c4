//! Multi-language code tabs.
//!
//! Each sample is highlighted independently; a sample whose highlighting
//! fails falls back to its escaped source. Copying the active sample flips
//! the copy state to [`CopyState::Copied`] and schedules a single reset.

use crate::RenderError;
use askama::Template;
use patternkit_core::markdown::highlight::plain_code_html;
use patternkit_core::{CodeSample, Highlighter};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

/// How long the "copied" confirmation stays up
pub const COPY_RESET_DELAY: Duration = Duration::from_millis(1500);

/// Final markup choice for a sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendition {
    Highlighted(String),
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SampleState {
    #[default]
    Idle,
    Highlighting,
    Ready(Rendition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyState {
    #[default]
    Idle,
    Copied,
}

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Destination for copied code
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// A pending copy-state reset. Dropping it cancels the reset.
#[derive(Debug)]
pub struct ScheduledReset {
    handle: JoinHandle<()>,
}

impl ScheduledReset {
    fn after(delay: Duration, state: Arc<watch::Sender<CopyState>>) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.send_replace(CopyState::Idle);
        });
        Self { handle }
    }

    pub fn is_pending(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for ScheduledReset {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Debug)]
pub struct CodeTabs {
    samples: Vec<CodeSample>,
    states: Vec<SampleState>,
    active: usize,
    copy_state: Arc<watch::Sender<CopyState>>,
    reset: Option<ScheduledReset>,
}

impl CodeTabs {
    pub fn new(samples: Vec<CodeSample>) -> Self {
        let (copy_state, _) = watch::channel(CopyState::Idle);
        Self {
            states: vec![SampleState::Idle; samples.len()],
            samples,
            active: 0,
            copy_state: Arc::new(copy_state),
            reset: None,
        }
    }

    pub fn samples(&self) -> &[CodeSample] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn state(&self, index: usize) -> Option<&SampleState> {
        self.states.get(index)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_sample(&self) -> Option<&CodeSample> {
        self.samples.get(self.active)
    }

    /// Highlight every sample concurrently on the blocking pool.
    pub async fn highlight_all(&mut self, highlighter: Arc<dyn Highlighter>) {
        let mut tasks = JoinSet::new();

        for (index, sample) in self.samples.iter().enumerate() {
            self.states[index] = SampleState::Highlighting;

            let highlighter = Arc::clone(&highlighter);
            let code = sample.code.clone();
            let lang = sample.lang.clone();
            tasks.spawn_blocking(move || (index, highlighter.highlight(&code, &lang)));
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(html))) => {
                    self.states[index] = SampleState::Ready(Rendition::Highlighted(html));
                }
                Ok((index, Err(e))) => {
                    tracing::debug!("Sample {} shown unhighlighted: {}", index, e);
                    self.states[index] = SampleState::Ready(Rendition::Fallback);
                }
                Err(e) => tracing::warn!("Highlight task failed: {}", e),
            }
        }

        // Samples whose task died never reported back
        for state in &mut self.states {
            if *state == SampleState::Highlighting {
                *state = SampleState::Ready(Rendition::Fallback);
            }
        }
    }

    /// Make tab `index` active. Out-of-range indexes are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.samples.len() {
            return false;
        }
        self.active = index;
        true
    }

    /// Make the first tab in `lang` active.
    pub fn select_lang(&mut self, lang: &str) -> bool {
        match self.samples.iter().position(|s| s.lang == lang) {
            Some(index) => self.select(index),
            None => false,
        }
    }

    pub fn copy_state(&self) -> CopyState {
        *self.copy_state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CopyState> {
        self.copy_state.subscribe()
    }

    pub fn has_pending_reset(&self) -> bool {
        self.reset.as_ref().is_some_and(ScheduledReset::is_pending)
    }

    /// Copy the active sample's code and show the confirmation.
    ///
    /// Must run inside a Tokio runtime, which drives the reset timer.
    pub fn copy(&mut self, clipboard: &dyn Clipboard) -> Result<(), ClipboardError> {
        let Some(sample) = self.samples.get(self.active) else {
            return Ok(());
        };

        clipboard.write_text(&sample.code)?;
        self.copy_state.send_replace(CopyState::Copied);

        // Replacing the previous reset aborts it
        self.reset = Some(ScheduledReset::after(
            COPY_RESET_DELAY,
            Arc::clone(&self.copy_state),
        ));

        Ok(())
    }

    /// Markup for one sample given its current state
    pub fn sample_html(&self, index: usize) -> Option<String> {
        let sample = self.samples.get(index)?;
        let html = match &self.states[index] {
            SampleState::Ready(Rendition::Highlighted(html)) => html.clone(),
            _ => plain_code_html(&sample.code, Some(&sample.lang)),
        };
        Some(html)
    }

    /// Render the tab strip and panels; no samples renders nothing.
    pub fn render(&self) -> Result<String, RenderError> {
        if self.samples.is_empty() {
            return Ok(String::new());
        }

        let tabs = self
            .samples
            .iter()
            .enumerate()
            .map(|(index, sample)| TabView {
                label: sample.display_label(),
                lang: sample.lang.clone(),
                active: index == self.active,
                body_html: self.sample_html(index).unwrap_or_default(),
            })
            .collect();

        let copy_label = match self.copy_state() {
            CopyState::Idle => "Copiar",
            CopyState::Copied => "Copiado",
        };

        let template = CodeTabsTemplate { tabs, copy_label };
        Ok(template.render()?)
    }
}

struct TabView {
    label: String,
    lang: String,
    active: bool,
    body_html: String,
}

#[derive(Template)]
#[template(path = "code_tabs.html")]
struct CodeTabsTemplate {
    tabs: Vec<TabView>,
    copy_label: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use patternkit_core::HighlightError;
    use std::sync::Mutex;

    /// Knows only TypeScript
    struct TsOnly;

    impl Highlighter for TsOnly {
        fn highlight(&self, code: &str, lang: &str) -> Result<String, HighlightError> {
            match lang {
                "ts" => Ok(format!("<pre class=\"hl\"><span>{}</span></pre>", code)),
                other => Err(HighlightError::UnsupportedLanguage(other.to_string())),
            }
        }
    }

    #[derive(Default)]
    struct RecordingClipboard {
        writes: Mutex<Vec<String>>,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            self.writes.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable("no display".into()))
        }
    }

    fn tabs() -> CodeTabs {
        CodeTabs::new(vec![
            CodeSample::new("ts", "const a = 1;"),
            CodeSample::new("xx", "a < b"),
        ])
    }

    #[tokio::test]
    async fn failed_highlight_falls_back_per_sample() {
        let mut tabs = tabs();
        tabs.highlight_all(Arc::new(TsOnly)).await;

        assert_eq!(
            tabs.state(0),
            Some(&SampleState::Ready(Rendition::Highlighted(
                "<pre class=\"hl\"><span>const a = 1;</span></pre>".into()
            )))
        );
        assert_eq!(tabs.state(1), Some(&SampleState::Ready(Rendition::Fallback)));

        let html = tabs.render().unwrap();
        assert!(html.contains("<pre class=\"hl\"><span>const a = 1;</span></pre>"));
        assert!(html.contains("<pre><code class=\"language-xx\">a &lt; b</code></pre>"));
        assert!(html.contains(">TS</button>"));
        assert!(html.contains(">XX</button>"));
    }

    #[tokio::test]
    async fn syntect_highlights_typescript_samples() {
        let mut tabs = tabs();
        tabs.highlight_all(Arc::new(patternkit_core::SyntectHighlighter::default()))
            .await;

        assert!(matches!(
            tabs.state(0),
            Some(SampleState::Ready(Rendition::Highlighted(html))) if html.contains("<span")
        ));
        assert_eq!(tabs.state(1), Some(&SampleState::Ready(Rendition::Fallback)));
    }

    #[test]
    fn selection() {
        let mut tabs = tabs();
        assert_eq!(tabs.active_index(), 0);
        assert!(tabs.select_lang("xx"));
        assert_eq!(tabs.active_sample().map(|s| s.code.as_str()), Some("a < b"));
        assert!(!tabs.select(7));
        assert!(!tabs.select_lang("rust"));
        assert_eq!(tabs.active_index(), 1);
    }

    #[test]
    fn empty_tabs_render_nothing() {
        let tabs = CodeTabs::new(Vec::new());
        assert_eq!(tabs.render().unwrap(), "");
    }

    #[tokio::test]
    async fn copy_writes_active_sample() {
        let mut tabs = tabs();
        let clipboard = RecordingClipboard::default();
        tabs.select(1);
        tabs.copy(&clipboard).unwrap();

        assert_eq!(*clipboard.writes.lock().unwrap(), vec!["a < b".to_string()]);
        assert_eq!(tabs.copy_state(), CopyState::Copied);
        assert!(tabs.render().unwrap().contains("Copiado"));
    }

    #[tokio::test]
    async fn failed_copy_keeps_state() {
        let mut tabs = tabs();
        assert!(tabs.copy(&BrokenClipboard).is_err());
        assert_eq!(tabs.copy_state(), CopyState::Idle);
        assert!(!tabs.has_pending_reset());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_follows_the_last_copy() {
        let mut tabs = tabs();
        let clipboard = RecordingClipboard::default();

        tabs.copy(&clipboard).unwrap();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        tabs.copy(&clipboard).unwrap();
        assert!(tabs.has_pending_reset());

        // 2000 ms: the first timer would have fired at 1500
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(tabs.copy_state(), CopyState::Copied);

        // 2600 ms: past 1500 ms after the second copy
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(tabs.copy_state(), CopyState::Idle);
        assert!(!tabs.has_pending_reset());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_tabs_cancels_the_reset() {
        let mut tabs = tabs();
        let rx = tabs.subscribe();
        tabs.copy(&RecordingClipboard::default()).unwrap();
        drop(tabs);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(*rx.borrow(), CopyState::Copied);
    }
}
