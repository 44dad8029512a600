use std::collections::HashMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::metrics::{CalculateOptions, Metric};
use crate::models::{Document, KeywordPositions, MetricResult, MetricValue};
use crate::scrape::extract_body;

/// Whitespace other than plain spaces, i.e. line breaks and tabs.
static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S ]+").expect("invalid regex"));

/// Byte offsets of every occurrence (overlapping included) of each search
/// term within the lowercased document text.
pub struct KeywordsPosition;

#[async_trait]
impl Metric for KeywordsPosition {
    fn name(&self) -> &'static str {
        "keywords-position"
    }

    fn requires_scraping(&self) -> bool {
        true
    }

    async fn calculate(&self, document: &Document, opts: &CalculateOptions) -> MetricResult {
        let text = LINE_BREAKS
            .replace_all(&extract_body(document), "")
            .to_lowercase();

        let mut keywords: HashMap<String, Vec<usize>> = HashMap::new();
        for keyword in opts
            .search_info
            .search_terms
            .split(' ')
            .filter(|keyword| !keyword.is_empty())
        {
            keywords.insert(keyword.to_string(), occurrences(&text, &keyword.to_lowercase()));
        }

        MetricResult {
            name: self.name().to_string(),
            index: opts.index,
            value: MetricValue::KeywordPositions(KeywordPositions {
                document_length: text.len(),
                keywords,
            }),
        }
    }
}

fn occurrences(text: &str, needle: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut offset = 0;
    while let Some(found) = text[offset..].find(needle) {
        let at = offset + found;
        positions.push(at);
        // Advance one character so overlapping matches count too.
        let step = text[at..].chars().next().map(char::len_utf8).unwrap_or(1);
        offset = at + step;
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchInfo;

    fn opts(search_terms: &str) -> CalculateOptions {
        CalculateOptions {
            search_info: SearchInfo {
                search_terms: search_terms.to_string(),
                ..Default::default()
            },
            index: 0,
        }
    }

    #[tokio::test]
    async fn test_keyword_offsets() {
        let document = Document {
            body: Some("Rust is great.\nRust is fast.".to_string()),
            ..Default::default()
        };
        let result = KeywordsPosition.calculate(&document, &opts("Rust")).await;

        // Line break removed: "rust is great.rust is fast."
        let MetricValue::KeywordPositions(positions) = result.value else {
            panic!("expected keyword positions");
        };
        assert_eq!(positions.document_length, 27);
        assert_eq!(positions.keywords["Rust"], vec![0, 14]);
    }

    #[tokio::test]
    async fn test_overlapping_occurrences() {
        let document = Document {
            body: Some("aaaa".to_string()),
            ..Default::default()
        };
        let result = KeywordsPosition.calculate(&document, &opts("aa")).await;

        let MetricValue::KeywordPositions(positions) = result.value else {
            panic!("expected keyword positions");
        };
        assert_eq!(positions.keywords["aa"], vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_absent_keyword_has_no_positions() {
        let document = Document {
            body: Some("nothing to see".to_string()),
            ..Default::default()
        };
        let result = KeywordsPosition.calculate(&document, &opts("missing")).await;

        let MetricValue::KeywordPositions(positions) = result.value else {
            panic!("expected keyword positions");
        };
        assert!(positions.keywords["missing"].is_empty());
    }
}
