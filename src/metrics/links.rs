use async_trait::async_trait;
use reqwest::Url;

use crate::metrics::{CalculateOptions, Metric};
use crate::models::{Document, MetricResult, MetricValue};
use crate::scrape::sel;

/// Registrable domains the document points at: its own hostname plus the
/// target of every link-ish element in the markup, first-seen order, deduped.
pub struct Links;

#[async_trait]
impl Metric for Links {
    fn name(&self) -> &'static str {
        "links"
    }

    fn requires_scraping(&self) -> bool {
        true
    }

    async fn calculate(&self, document: &Document, opts: &CalculateOptions) -> MetricResult {
        let result = |value| MetricResult {
            name: self.name().to_string(),
            index: opts.index,
            value,
        };

        let Some(html_code) = document.html_code.as_deref() else {
            return result(MetricValue::sentinel());
        };

        let html = scraper::Html::parse_document(html_code);
        let mut anchors: Vec<String> = Vec::new();

        if let Some(link) = document.link.as_deref()
            && let Some(domain) = registrable_domain(link)
        {
            anchors.push(domain);
        }

        for element in html.select(sel!("a, img, video, audio, iframe, source")) {
            let attr = match element.value().name() {
                "a" => "href",
                _ => "src",
            };
            if let Some(source) = element.value().attr(attr)
                && let Some(domain) = registrable_domain(source)
                && !anchors.contains(&domain)
            {
                anchors.push(domain);
            }
        }

        result(MetricValue::List(anchors))
    }
}

/// `example.com` out of `https://www.example.com/path`, `None` for relative
/// or unparsable sources.
fn registrable_domain(source: &str) -> Option<String> {
    if source.is_empty() || source == "#" {
        return None;
    }
    let url = Url::parse(source).ok()?;
    let host = url.host_str()?;
    let domain = addr::parse_domain_name(host).ok()?;
    Some(domain.root().unwrap_or(host).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchInfo;

    fn opts() -> CalculateOptions {
        CalculateOptions {
            search_info: SearchInfo::default(),
            index: 0,
        }
    }

    #[test]
    fn test_registrable_domain() {
        assert_eq!(
            registrable_domain("https://www.example.com/path"),
            Some("example.com".to_string())
        );
        assert_eq!(registrable_domain("#"), None);
        assert_eq!(registrable_domain("/relative/path"), None);
        assert_eq!(registrable_domain(""), None);
    }

    #[tokio::test]
    async fn test_collects_deduplicated_domains() {
        let document = Document {
            link: Some("https://news.example.com/article".to_string()),
            html_code: Some(
                "<html><body>\
                 <a href='https://one.test/a'>a</a>\
                 <a href='https://two.test/b'>b</a>\
                 <img src='https://one.test/img.png'>\
                 <a href='#'>self</a>\
                 </body></html>"
                    .to_string(),
            ),
            ..Default::default()
        };
        let result = Links.calculate(&document, &opts()).await;
        assert_eq!(
            result.value,
            MetricValue::List(vec![
                "example.com".to_string(),
                "one.test".to_string(),
                "two.test".to_string(),
            ])
        );
    }

    #[tokio::test]
    async fn test_without_markup_is_sentinel() {
        let result = Links.calculate(&Document::default(), &opts()).await;
        assert_eq!(result.value, MetricValue::sentinel());
    }
}
