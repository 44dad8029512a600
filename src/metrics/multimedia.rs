use async_trait::async_trait;

use crate::metrics::{CalculateOptions, Metric};
use crate::models::{Document, MetricResult, MetricValue, MultimediaCount};
use crate::scrape::sel;

/// Counts of video, image and audio elements in the document markup.
pub struct Multimedia;

#[async_trait]
impl Metric for Multimedia {
    fn name(&self) -> &'static str {
        "multimedia"
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

        let Some(content) = document
            .html_code
            .as_deref()
            .or(document.body.as_deref())
        else {
            log::debug!("No HTML or body available, returning -1");
            return result(MetricValue::sentinel());
        };

        if content.trim().is_empty() {
            return result(MetricValue::Multimedia(MultimediaCount::default()));
        }

        let html = scraper::Html::parse_document(content);
        let counts = MultimediaCount {
            video: html.select(sel!("video")).count(),
            // <img> inside <picture> counts once, as the picture.
            img: html.select(sel!("picture, :not(picture)>img")).count(),
            audio: html.select(sel!("audio")).count(),
        };

        result(MetricValue::Multimedia(counts))
    }
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

    #[tokio::test]
    async fn test_counts_elements() {
        let document = Document {
            html_code: Some(
                "<html><body>\
                 <video src='a.mp4'></video>\
                 <img src='a.png'><img src='b.png'>\
                 <audio src='a.ogg'></audio>\
                 </body></html>"
                    .to_string(),
            ),
            ..Default::default()
        };
        let result = Multimedia.calculate(&document, &opts()).await;
        assert_eq!(
            result.value,
            MetricValue::Multimedia(MultimediaCount {
                video: 1,
                img: 2,
                audio: 1,
            })
        );
    }

    #[tokio::test]
    async fn test_missing_content_is_sentinel() {
        let result = Multimedia.calculate(&Document::default(), &opts()).await;
        assert_eq!(result.value, MetricValue::sentinel());
    }

    #[tokio::test]
    async fn test_blank_content_counts_zero() {
        let document = Document {
            html_code: Some("   ".to_string()),
            ..Default::default()
        };
        let result = Multimedia.calculate(&document, &opts()).await;
        assert_eq!(
            result.value,
            MetricValue::Multimedia(MultimediaCount::default())
        );
    }
}
