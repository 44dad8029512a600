use serde::{Deserialize, Serialize};

use crate::models::Document;

/// Total result estimate as reported by the provider. Some providers report a
/// formatted string ("About 1,000,000 results"), others a plain count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalResults {
    Count(u64),
    Text(String),
}

impl Default for TotalResults {
    fn default() -> Self {
        Self::Count(0)
    }
}

/// One standardized page of ranked results, independent of the provider's
/// wire format. `number_of_items` always equals `documents.len()`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultPage {
    pub total_results: TotalResults,
    pub search_terms: String,
    pub number_of_items: usize,
    pub start_index: usize,
    pub documents: Vec<Document>,
}

/// Page-level context handed to every metric evaluator.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchInfo {
    pub total_results: TotalResults,
    pub search_terms: String,
    pub number_of_items: usize,
    pub start_index: usize,
}

impl From<&SearchResultPage> for SearchInfo {
    fn from(page: &SearchResultPage) -> Self {
        Self {
            total_results: page.total_results.clone(),
            search_terms: page.search_terms.clone(),
            number_of_items: page.number_of_items,
            start_index: page.start_index,
        }
    }
}

/// A contiguous sub-range of the requested result range, handled by exactly
/// one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partition {
    pub start_index: usize,
    pub num_results: usize,
}
