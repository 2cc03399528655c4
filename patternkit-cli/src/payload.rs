//! Shared JSON schema helpers for machine-readable output and the API.

use patternkit_core::{Entry, Summary, Topic, TopicFrontmatter};
use serde::Serialize;

pub const SCHEMA_VERSION: &str = "patternkit-v1";

/// Standard envelope for machine-consumable responses.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub schema_version: &'static str,
    pub kind: &'static str,
    pub data: T,
}

pub fn envelope<T>(kind: &'static str, data: T) -> Envelope<T> {
    Envelope {
        schema_version: SCHEMA_VERSION,
        kind,
        data,
    }
}

#[derive(Serialize)]
pub struct SlugListData {
    pub topic: Topic,
    pub slugs: Vec<String>,
}

#[derive(Serialize)]
pub struct SummaryListData<F> {
    pub topic: Topic,
    pub total: usize,
    pub summaries: Vec<Summary<F>>,
}

impl<F: TopicFrontmatter> SummaryListData<F> {
    pub fn new(summaries: Vec<Summary<F>>) -> Self {
        Self {
            topic: F::TOPIC,
            total: summaries.len(),
            summaries,
        }
    }
}

/// A compiled entry together with its rendered HTML
#[derive(Serialize)]
pub struct EntryData<F> {
    pub topic: Topic,
    #[serde(flatten)]
    pub entry: Entry<F>,
    pub html: String,
}

impl<F: TopicFrontmatter> EntryData<F> {
    pub fn new(entry: Entry<F>, html: String) -> Self {
        Self {
            topic: F::TOPIC,
            entry,
            html,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorData {
    pub message: String,
}
