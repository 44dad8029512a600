use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::MetricValue;

/// One ranked result produced by a SERP adapter and enriched in place by the
/// metric dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub title: String,
    /// Absent when the document has no external location to fetch from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Raw text supplied by the SERP adapter, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Raw markup fetched during the scrape pass. Discarded once every metric
    /// has read it, so enriched responses never carry markup onward.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Metric name to computed value, filled by the pipeline.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metrics: HashMap<String, MetricValue>,
}

impl Document {
    /// `true` when the link parses as an absolute http(s) URL.
    pub fn has_valid_link(&self) -> bool {
        self.valid_link().is_some()
    }

    pub(crate) fn valid_link(&self) -> Option<reqwest::Url> {
        let link = self.link.as_deref()?;
        let url = reqwest::Url::parse(link).ok()?;
        matches!(url.scheme(), "http" | "https").then_some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_link() {
        let mut doc = Document {
            link: Some("https://example.com/page".to_string()),
            ..Default::default()
        };
        assert!(doc.has_valid_link());

        doc.link = Some("not a url".to_string());
        assert!(!doc.has_valid_link());

        doc.link = Some("ftp://example.com/file".to_string());
        assert!(!doc.has_valid_link());

        doc.link = None;
        assert!(!doc.has_valid_link());
    }
}
