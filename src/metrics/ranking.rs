use async_trait::async_trait;

use crate::metrics::{CalculateOptions, Metric};
use crate::models::{Document, MetricResult, MetricValue};

/// Global rank of the document: the page's start index plus the document's
/// position within it.
pub struct Ranking;

#[async_trait]
impl Metric for Ranking {
    fn name(&self) -> &'static str {
        "ranking"
    }

    async fn calculate(&self, _document: &Document, opts: &CalculateOptions) -> MetricResult {
        MetricResult {
            name: self.name().to_string(),
            index: opts.index,
            value: MetricValue::Score((opts.search_info.start_index + opts.index) as f64),
        }
    }
}
