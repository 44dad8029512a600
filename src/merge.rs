use crate::error::Error;
use crate::models::SearchResultPage;

/// Combine per-partition responses, given in partition submission order, into
/// one page. Totals and search terms come from the first response; documents
/// concatenate in partition order, which is global rank order because
/// partitions are contiguous and non-overlapping.
pub fn merge(responses: Vec<SearchResultPage>) -> Result<SearchResultPage, Error> {
    let mut responses = responses.into_iter();
    let Some(mut merged) = responses.next() else {
        return Err(Error::Merge("no partition responses"));
    };

    for page in responses {
        merged.number_of_items += page.number_of_items;
        merged.documents.extend(page.documents);
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Document, TotalResults};

    fn page(start_index: usize, size: usize) -> SearchResultPage {
        SearchResultPage {
            total_results: TotalResults::Text("10".to_string()),
            search_terms: "query".to_string(),
            number_of_items: size,
            start_index,
            documents: (0..size)
                .map(|offset| Document {
                    title: format!("doc {}", start_index + offset),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn test_merge_preserves_rank_order() {
        let merged = merge(vec![page(0, 3), page(3, 3), page(6, 4)]).unwrap();

        assert_eq!(merged.number_of_items, 10);
        assert_eq!(merged.start_index, 0);
        assert_eq!(merged.total_results, TotalResults::Text("10".to_string()));
        assert_eq!(merged.search_terms, "query");
        let titles: Vec<String> = merged
            .documents
            .iter()
            .map(|doc| doc.title.clone())
            .collect();
        let expected: Vec<String> = (0..10).map(|i| format!("doc {i}")).collect();
        assert_eq!(titles, expected);
    }

    #[test]
    fn test_merge_single_response() {
        let merged = merge(vec![page(5, 2)]).unwrap();
        assert_eq!(merged.number_of_items, 2);
        assert_eq!(merged.start_index, 5);
    }

    #[test]
    fn test_merge_nothing_is_an_error() {
        assert!(matches!(merge(vec![]), Err(Error::Merge(_))));
    }
}
