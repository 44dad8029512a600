use std::path::Path;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Format, Json, Serialized, Toml, Yaml},
};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Pipeline configuration. An explicit value handed to the pipeline
/// constructor, never ambient process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Split requests across multiple workers. With `false` everything runs
    /// on a single worker regardless of `worker_threads`.
    pub enable_multi_core: bool,
    /// Number of pool workers to partition a request across.
    pub worker_threads: usize,
    /// Default number of results to request from the SERP. The pipeline
    /// itself always receives an explicit count; this default is for the
    /// embedding HTTP layer to fall back on when a request omits it.
    pub number_of_results: usize,
    /// Per-document download timeout in milliseconds.
    pub request_timeout: u64,
    /// Upper bound in milliseconds for one page's whole scrape pass. Documents
    /// still pending past it are treated as scrape-failed.
    pub scrape_pass_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_multi_core: true,
            worker_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            number_of_results: 10,
            request_timeout: 5_000,
            scrape_pass_timeout: 30_000,
        }
    }
}

impl Config {
    /// Load the configuration from a toml/json/yaml file layered over the
    /// defaults. The file type is picked from the extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        log::debug!("Loading config from {}", path.display());

        let figment = Figment::from(Serialized::defaults(Config::default()));
        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => figment.merge(Toml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
            _ => return Err(Error::ConfigFile(path.display().to_string())),
        };

        let config: Config = figment.extract()?;
        log::debug!("Loaded config: {:#?}", config);
        Ok(config)
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }

    pub(crate) fn scrape_pass_timeout(&self) -> Duration {
        Duration::from_millis(self.scrape_pass_timeout)
    }
}
