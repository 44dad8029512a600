use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::SearchResultPage;

/// One SERP provider adapter. Implementations own all provider-specific query
/// construction and response parsing; the pipeline only sees the standardized
/// page shape.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Query the provider for `number_of_results` documents starting at
    /// `start_index` and return them in the standardized page shape.
    async fn search(
        &self,
        query: &str,
        start_index: usize,
        number_of_results: usize,
    ) -> anyhow::Result<SearchResultPage>;
}

pub type BoxedSearchEngine = Arc<dyn SearchEngine>;

/// Explicit name-to-adapter mapping, populated at startup by the caller.
/// Registering under an existing name overrides that entry.
#[derive(Default, Clone)]
pub struct EngineRegistry {
    engines: HashMap<String, BoxedSearchEngine>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, engine: BoxedSearchEngine) {
        let name = engine.name().to_string();
        log::debug!("Registering search engine '{}'", name);
        self.engines.insert(name, engine);
    }

    /// Register under a caller-chosen key, e.g. to shadow a built-in name
    /// with a personal adapter.
    pub fn register_as(&mut self, name: impl Into<String>, engine: BoxedSearchEngine) {
        self.engines.insert(name.into(), engine);
    }

    pub fn get(&self, name: &str) -> Option<BoxedSearchEngine> {
        self.engines.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.engines.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TotalResults;

    struct StaticEngine(&'static str);

    #[async_trait]
    impl SearchEngine for StaticEngine {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn search(
            &self,
            query: &str,
            start_index: usize,
            number_of_results: usize,
        ) -> anyhow::Result<SearchResultPage> {
            Ok(SearchResultPage {
                total_results: TotalResults::Count(0),
                search_terms: query.to_string(),
                number_of_items: 0,
                start_index,
                documents: Vec::with_capacity(number_of_results),
            })
        }
    }

    #[test]
    fn test_register_and_override() {
        let mut registry = EngineRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(StaticEngine("mock")));
        assert!(registry.contains("mock"));
        assert!(!registry.contains("other"));

        registry.register_as("mock", Arc::new(StaticEngine("personal")));
        assert_eq!(registry.get("mock").unwrap().name(), "personal");
    }
}
