use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Multimedia element counts of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MultimediaCount {
    pub video: usize,
    pub img: usize,
    pub audio: usize,
}

/// Byte offsets of every search keyword within the extracted document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct KeywordPositions {
    pub document_length: usize,
    pub keywords: HashMap<String, Vec<usize>>,
}

/// Typed failure marker for a single (document, metric) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorValue {
    pub code: i64,
    pub message: String,
}

/// The value a metric evaluator can produce. Serializes untagged so enriched
/// responses keep the plain JSON shape SERP consumers expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Score(f64),
    Label(String),
    List(Vec<String>),
    Multimedia(MultimediaCount),
    KeywordPositions(KeywordPositions),
    Error(ErrorValue),
    None,
}

impl MetricValue {
    /// The `-1` marker metrics fall back to when they cannot evaluate a
    /// document at all.
    pub fn sentinel() -> Self {
        Self::Score(-1.0)
    }
}

/// One evaluated metric, addressed back to its document by `index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub name: String,
    pub index: usize,
    pub value: MetricValue,
}
