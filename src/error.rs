use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid inputs to the partition planner. Fatal to the request, raised
    /// before any worker is spawned.
    #[error("invalid partition plan: {0}")]
    Planning(String),

    /// A document fetch failed or timed out during the scrape pass.
    #[error("scrape request failed: {0}")]
    Scrape(#[from] reqwest::Error),

    /// The requested engine was never registered.
    #[error("search engine '{0}' is not registered")]
    UnknownEngine(String),

    #[error("search query must not be empty")]
    EmptyQuery,

    /// A partition-level provider query failed.
    #[error("search engine request failed: {0}")]
    Search(#[source] anyhow::Error),

    /// A worker died mid-task. The pool replaces the worker; the task's
    /// submitter receives this instead of hanging.
    #[error("worker #{0} crashed while processing a task")]
    WorkerCrash(usize),

    #[error("worker pool is closed")]
    PoolClosed,

    /// One partition of the request failed entirely. Merging cannot proceed
    /// with a missing range, so this fails the whole request.
    #[error("partition [{start_index}, {start_index}+{num_results}) failed: {message}")]
    PartitionTask {
        start_index: usize,
        num_results: usize,
        message: String,
    },

    #[error("cannot merge partition responses: {0}")]
    Merge(&'static str),

    #[error("invalid configuration: {0}")]
    Config(#[from] figment::Error),

    #[error("cannot identify config file type for '{0}', must be .toml, .json or .yaml")]
    ConfigFile(String),
}
