//! Partitioned, multi-worker SERP metrics pipeline.
//!
//! Given a query and a desired result count, the pipeline splits the range
//! across a pool of workers. Each worker independently re-queries the search
//! engine for its sub-range, scrapes the linked documents and computes the
//! requested metrics per document; the partial pages are then merged back
//! into one response in rank order.
//!
//! ```no_run
//! # use serpgauge::{Config, SerpGauge, serp::EngineRegistry};
//! # async fn example(my_engine: serpgauge::serp::BoxedSearchEngine) -> Result<(), serpgauge::Error> {
//! let mut engines = EngineRegistry::new();
//! engines.register(my_engine);
//!
//! let gauge = SerpGauge::new(Config::default(), engines);
//! let metrics = vec!["ranking".to_string(), "length".to_string()];
//! let _page = gauge.web_search("google", "rust async", 10, &metrics, 0).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod merge;
pub mod metrics;
pub mod models;
pub mod partition;
pub mod pool;
pub mod scrape;
pub mod serp;

use std::sync::Arc;

use async_trait::async_trait;

pub use config::Config;
pub use error::Error;
pub use models::{Document, MetricResult, MetricValue, Partition, SearchResultPage};

use metrics::{MetricDispatcher, MetricRegistry};
use pool::{TaskRunner, WorkerPool};
use scrape::{DefaultScraper, Scraper};
use serp::EngineRegistry;

/// One partition's unit of work: re-run the query for a sub-range and enrich
/// the resulting documents with metrics.
#[derive(Debug, Clone)]
pub struct PartitionTask {
    pub engine: String,
    pub query: String,
    pub partition: Partition,
    pub metric_names: Vec<String>,
}

struct PartitionRunner {
    engines: Arc<EngineRegistry>,
    dispatcher: MetricDispatcher,
}

#[async_trait]
impl TaskRunner for PartitionRunner {
    type Task = PartitionTask;
    type Output = SearchResultPage;

    async fn run(&self, task: PartitionTask) -> Result<SearchResultPage, Error> {
        run_partition(
            &self.engines,
            &self.dispatcher,
            &task.engine,
            &task.query,
            task.partition,
            &task.metric_names,
        )
        .await
    }
}

async fn run_partition(
    engines: &EngineRegistry,
    dispatcher: &MetricDispatcher,
    engine: &str,
    query: &str,
    partition: Partition,
    metric_names: &[String],
) -> Result<SearchResultPage, Error> {
    let search_engine = engines
        .get(engine)
        .ok_or_else(|| Error::UnknownEngine(engine.to_string()))?;

    let mut page = search_engine
        .search(query, partition.start_index, partition.num_results)
        .await
        .map_err(Error::Search)?;

    let results = dispatcher.get_metrics(&mut page, metric_names).await;
    metrics::apply_metrics(&mut page, results);
    Ok(page)
}

/// The pipeline handle: engine and metric registries plus configuration,
/// handed in explicitly at construction.
pub struct SerpGauge {
    config: Config,
    engines: Arc<EngineRegistry>,
    metrics: Arc<MetricRegistry>,
    scraper: Arc<dyn Scraper>,
}

impl SerpGauge {
    /// Pipeline with the built-in metrics and the default network scraper.
    pub fn new(config: Config, engines: EngineRegistry) -> Self {
        let scraper = Arc::new(DefaultScraper::new(config.clone()));
        Self::with_parts(config, engines, MetricRegistry::with_builtins(), scraper)
    }

    pub fn with_parts(
        config: Config,
        engines: EngineRegistry,
        metrics: MetricRegistry,
        scraper: Arc<dyn Scraper>,
    ) -> Self {
        if engines.is_empty() {
            log::warn!("No search engines registered, every search will fail");
        }
        Self {
            config,
            engines: Arc::new(engines),
            metrics: Arc::new(metrics),
            scraper,
        }
    }

    /// Replace the scraping strategy, e.g. with a content-store lookup.
    pub fn with_scraper(mut self, scraper: Arc<dyn Scraper>) -> Self {
        self.scraper = scraper;
        self
    }

    fn dispatcher(&self) -> MetricDispatcher {
        MetricDispatcher::new(
            Arc::clone(&self.metrics),
            Arc::clone(&self.scraper),
            self.config.clone(),
        )
    }

    /// Run the full pipeline: plan partitions, dispatch one task per
    /// partition to a worker pool, and merge the partial pages back in rank
    /// order. Resolves with the fully merged page or rejects with the first
    /// stage that failed; a fully-failed partition fails the whole request.
    pub async fn web_search(
        &self,
        engine: &str,
        query: &str,
        number_of_results: usize,
        metric_names: &[String],
        start_index: usize,
    ) -> Result<SearchResultPage, Error> {
        if query.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }
        if !self.engines.contains(engine) {
            return Err(Error::UnknownEngine(engine.to_string()));
        }

        let threads = if self.config.enable_multi_core {
            self.config.worker_threads.max(1)
        } else {
            1
        };
        log::debug!("Using [{}] worker threads", threads);

        let partitions = partition::plan(threads, number_of_results, start_index)?;

        log::debug!("Initializing worker pool...");
        let runner = Arc::new(PartitionRunner {
            engines: Arc::clone(&self.engines),
            dispatcher: self.dispatcher(),
        });
        let pool = WorkerPool::new(partitions.len(), runner);

        let submissions: Vec<_> = partitions
            .iter()
            .map(|&partition| {
                log::debug!(
                    "Sending partition startIndex [{}] numResults [{}]",
                    partition.start_index,
                    partition.num_results
                );
                let task = PartitionTask {
                    engine: engine.to_string(),
                    query: query.to_string(),
                    partition,
                    metric_names: metric_names.to_vec(),
                };
                (partition, pool.submit(task))
            })
            .collect();

        let mut responses = Vec::with_capacity(submissions.len());
        for (partition, receiver) in submissions {
            let result = receiver.await.unwrap_or(Err(Error::PoolClosed));
            match result {
                Ok(page) => responses.push(page),
                Err(err) => {
                    pool.close();
                    return Err(Error::PartitionTask {
                        start_index: partition.start_index,
                        num_results: partition.num_results,
                        message: err.to_string(),
                    });
                }
            }
        }
        pool.close();

        merge::merge(responses)
    }

    /// The unit of work a pool worker runs for one partition: query the
    /// engine for the sub-range, compute metrics, fold them into the
    /// documents. Also usable directly, e.g. from a remote worker process.
    pub async fn web_search_partition(
        &self,
        engine: &str,
        query: &str,
        start_index: usize,
        number_of_results: usize,
        metric_names: &[String],
    ) -> Result<SearchResultPage, Error> {
        run_partition(
            &self.engines,
            &self.dispatcher(),
            engine,
            query,
            Partition {
                start_index,
                num_results: number_of_results,
            },
            metric_names,
        )
        .await
    }
}
