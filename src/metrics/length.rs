use async_trait::async_trait;

use crate::metrics::{CalculateOptions, Metric};
use crate::models::{Document, MetricResult, MetricValue};
use crate::scrape::extract_body;

/// Character count of the extracted document text.
pub struct Length;

#[async_trait]
impl Metric for Length {
    fn name(&self) -> &'static str {
        "length"
    }

    fn requires_scraping(&self) -> bool {
        true
    }

    async fn calculate(&self, document: &Document, opts: &CalculateOptions) -> MetricResult {
        let text = extract_body(document);
        MetricResult {
            name: self.name().to_string(),
            index: opts.index,
            value: MetricValue::Score(text.chars().count() as f64 + 1.0),
        }
    }
}
