pub mod document;
pub mod metric;
pub mod page;

pub use document::Document;
pub use metric::{ErrorValue, KeywordPositions, MetricResult, MetricValue, MultimediaCount};
pub use page::{Partition, SearchInfo, SearchResultPage, TotalResults};
