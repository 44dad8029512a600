use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use crate::config::Config;
use crate::models::{Document, MetricResult, SearchInfo, SearchResultPage};
use crate::scrape::{self, Scraper};

pub mod keywords_position;
pub mod language;
pub mod length;
pub mod links;
pub mod multimedia;
pub mod ranking;

pub use keywords_position::KeywordsPosition;
pub use language::Language;
pub use length::Length;
pub use links::Links;
pub use multimedia::Multimedia;
pub use ranking::Ranking;

/// Context handed to every metric evaluation.
#[derive(Debug, Clone)]
pub struct CalculateOptions {
    pub search_info: SearchInfo,
    pub index: usize,
}

/// A named, pluggable per-document metric. `calculate` is total: internal
/// failures come back as an error-shaped [`MetricValue`], never as a panic or
/// an aborted batch. Evaluators run concurrently, so they must not share
/// mutable state.
///
/// [`MetricValue`]: crate::models::MetricValue
#[async_trait]
pub trait Metric: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this metric reads the full scraped document content
    /// (`html_code`) rather than just the adapter-supplied fields.
    fn requires_scraping(&self) -> bool {
        false
    }

    async fn calculate(&self, document: &Document, opts: &CalculateOptions) -> MetricResult;
}

pub type BoxedMetric = Arc<dyn Metric>;

/// Name-to-evaluator mapping: the built-ins plus any caller-supplied metrics.
/// Registering an existing name overrides it.
#[derive(Clone)]
pub struct MetricRegistry {
    metrics: HashMap<String, BoxedMetric>,
}

impl MetricRegistry {
    /// Registry with every built-in metric.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            metrics: HashMap::new(),
        };
        registry.register(Arc::new(Ranking));
        registry.register(Arc::new(Length));
        registry.register(Arc::new(Language));
        registry.register(Arc::new(KeywordsPosition));
        registry.register(Arc::new(Multimedia));
        registry.register(Arc::new(Links));
        registry
    }

    pub fn empty() -> Self {
        Self {
            metrics: HashMap::new(),
        }
    }

    pub fn register(&mut self, metric: BoxedMetric) {
        self.metrics.insert(metric.name().to_string(), metric);
    }

    pub fn get(&self, name: &str) -> Option<BoxedMetric> {
        self.metrics.get(name).cloned()
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Runs the requested metrics against every document of a page.
#[derive(Clone)]
pub struct MetricDispatcher {
    registry: Arc<MetricRegistry>,
    scraper: Arc<dyn Scraper>,
    config: Config,
}

impl MetricDispatcher {
    pub fn new(registry: Arc<MetricRegistry>, scraper: Arc<dyn Scraper>, config: Config) -> Self {
        Self {
            registry,
            scraper,
            config,
        }
    }

    /// Evaluate `metric_names` for every document of `page`.
    ///
    /// Unknown names are skipped with a diagnostic. If any resolved metric
    /// requires scraping, one scrape pass runs over all documents first;
    /// after evaluation the transient `html_code` is discarded again. Every
    /// (document, metric) pair evaluates concurrently and independently; the
    /// caller folds the returned results back by their `index` field.
    pub async fn get_metrics(
        &self,
        page: &mut SearchResultPage,
        metric_names: &[String],
    ) -> Vec<MetricResult> {
        if metric_names.is_empty() || page.documents.is_empty() {
            return Vec::new();
        }

        let mut resolved: Vec<BoxedMetric> = Vec::with_capacity(metric_names.len());
        for name in metric_names {
            match self.registry.get(name) {
                Some(metric) => resolved.push(metric),
                None => log::warn!("Metric '{}' not found in available metrics", name),
            }
        }
        if resolved.is_empty() {
            return Vec::new();
        }

        let scraping_required = resolved.iter().any(|metric| metric.requires_scraping());
        if scraping_required {
            scrape::scrape_all(&mut page.documents, self.scraper.as_ref(), &self.config).await;
        }

        let search_info = SearchInfo::from(&*page);
        let mut evaluations = Vec::with_capacity(page.documents.len() * resolved.len());
        for (index, document) in page.documents.iter().enumerate() {
            for metric in &resolved {
                let metric = Arc::clone(metric);
                let opts = CalculateOptions {
                    search_info: search_info.clone(),
                    index,
                };
                evaluations.push(async move { metric.calculate(document, &opts).await });
            }
        }
        let results = join_all(evaluations).await;

        // The enriched response does not carry raw markup onward.
        if scraping_required {
            for document in &mut page.documents {
                document.html_code = None;
            }
        }

        results
    }
}

/// Fold dispatcher results back into the documents they belong to.
pub fn apply_metrics(page: &mut SearchResultPage, results: Vec<MetricResult>) {
    for result in results {
        match page.documents.get_mut(result.index) {
            Some(document) => {
                document.metrics.insert(result.name, result.value);
            }
            None => log::warn!(
                "Metric '{}' addressed out-of-range document index {}",
                result.name,
                result.index
            ),
        }
    }
}
