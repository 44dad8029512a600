use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use tokio::time::Instant;

use crate::config::Config;
use crate::error::Error;
use crate::models::Document;

macro_rules! sel {
    ($sel:literal) => {
        &scraper::Selector::parse($sel).expect("invalid selector")
    };
}
pub(crate) use sel;

/// Produces the raw content of one document. Implementations may fetch over
/// the network, read a content store, or hand back pre-supplied text; the
/// dispatcher never assumes which strategy is active.
#[async_trait]
pub trait Scraper: Send + Sync {
    async fn scrape(&self, document: &Document) -> Result<Option<String>, Error>;
}

/// Default strategy: fetch the document's link over HTTP bounded by the
/// configured timeout. Documents without a valid absolute link fall back to
/// their pre-supplied body.
pub struct DefaultScraper {
    client: Client,
    config: Config,
}

impl DefaultScraper {
    pub fn new(config: Config) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Scraper for DefaultScraper {
    async fn scrape(&self, document: &Document) -> Result<Option<String>, Error> {
        if let Some(url) = document.valid_link() {
            log::debug!("Scraping from the web [{}]", url);
            let response = self
                .client
                .get(url)
                .timeout(self.config.request_timeout())
                .send()
                .await?;
            let html_code = response.text().await?;
            return Ok(Some(html_code));
        }

        Ok(document.body.clone())
    }
}

/// Run the scrape pass for a whole page: fetch every document concurrently
/// and store the content as `html_code`. The pass as a whole is bounded by
/// the aggregate timeout; a document that fails or is still pending when it
/// expires is marked scrape-failed (`html_code = None`) instead of failing
/// the partition.
pub async fn scrape_all(documents: &mut [Document], scraper: &dyn Scraper, config: &Config) {
    let deadline = Instant::now() + config.scrape_pass_timeout();

    let fetches = documents.iter().map(|document| async move {
        match tokio::time::timeout_at(deadline, scraper.scrape(document)).await {
            Ok(Ok(content)) => content,
            Ok(Err(err)) => {
                log::warn!("Error while scraping doc '{}': {}", document.title, err);
                None
            }
            Err(_) => {
                log::warn!("Timeout fetching doc '{}'", document.title);
                None
            }
        }
    });
    let contents = join_all(fetches).await;

    for (document, content) in documents.iter_mut().zip(contents) {
        document.html_code = content;
    }
}

/// Text of the document: the pre-supplied body verbatim if non-empty, else
/// the rendered text of the `<body>` of the scraped markup, else empty.
/// Total, no I/O.
pub fn extract_body(document: &Document) -> String {
    if let Some(body) = document.body.as_deref()
        && !body.is_empty()
    {
        return body.to_string();
    }

    if let Some(html_code) = document.html_code.as_deref()
        && !html_code.is_empty()
    {
        let html = scraper::Html::parse_document(html_code);
        return html
            .select(sel!("body"))
            .next()
            .map(|body| body.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
    }

    String::new()
}
