use async_trait::async_trait;

use crate::metrics::{CalculateOptions, Metric};
use crate::models::{Document, MetricResult, MetricValue};

/// Detected natural language of the document, from the body with the snippet
/// as fallback. Works on adapter-supplied fields only, so no scraping.
pub struct Language;

#[async_trait]
impl Metric for Language {
    fn name(&self) -> &'static str {
        "language"
    }

    async fn calculate(&self, document: &Document, opts: &CalculateOptions) -> MetricResult {
        let text = document
            .body
            .as_deref()
            .filter(|text| !text.is_empty())
            .or_else(|| document.snippet.as_deref().filter(|text| !text.is_empty()));

        let value = match text.and_then(whatlang::detect) {
            Some(info) => MetricValue::Label(info.lang().eng_name().to_lowercase()),
            None => MetricValue::None,
        };

        MetricResult {
            name: self.name().to_string(),
            index: opts.index,
            value,
        }
    }
}
