use crate::error::Error;
use crate::models::Partition;

/// Split the requested result range `[start_index, start_index + num_results)`
/// into one contiguous, non-overlapping sub-range per worker.
///
/// When there are fewer results than workers a single partition covers the
/// whole range so no idle workers get spawned. Otherwise every partition gets
/// `num_results / threads` results and the last one absorbs the remainder.
pub fn plan(
    threads: usize,
    num_results: usize,
    start_index: usize,
) -> Result<Vec<Partition>, Error> {
    if threads == 0 {
        return Err(Error::Planning("thread count must be positive".to_string()));
    }
    if num_results == 0 {
        return Err(Error::Planning(
            "number of results must be positive".to_string(),
        ));
    }

    log::debug!(
        "Generating partitions with threads [{}], numResults [{}], startIndex [{}]",
        threads,
        num_results,
        start_index
    );

    if num_results < threads {
        return Ok(vec![Partition {
            start_index,
            num_results,
        }]);
    }

    let base = num_results / threads;
    let mut partitions = Vec::with_capacity(threads);
    let mut next = start_index;

    for _ in 0..threads - 1 {
        partitions.push(Partition {
            start_index: next,
            num_results: base,
        });
        next += base;
    }

    // The whole remainder lands on the last partition. Distributing it would
    // shift externally observable range boundaries.
    partitions.push(Partition {
        start_index: next,
        num_results: num_results - base * (threads - 1),
    });

    Ok(partitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariants(partitions: &[Partition], num_results: usize, start_index: usize) {
        assert!(!partitions.is_empty());
        let mut expected_start = start_index;
        let mut total = 0;
        for partition in partitions {
            assert!(partition.num_results > 0, "zero-size partition emitted");
            assert_eq!(partition.start_index, expected_start, "gap or overlap");
            expected_start += partition.num_results;
            total += partition.num_results;
        }
        assert_eq!(total, num_results, "partitions drop or duplicate results");
    }

    #[test]
    fn test_even_split_with_remainder() {
        let partitions = plan(3, 10, 0).unwrap();
        assert_eq!(
            partitions,
            vec![
                Partition { start_index: 0, num_results: 3 },
                Partition { start_index: 3, num_results: 3 },
                Partition { start_index: 6, num_results: 4 },
            ]
        );
    }

    #[test]
    fn test_fewer_results_than_threads() {
        let partitions = plan(5, 3, 0).unwrap();
        assert_eq!(
            partitions,
            vec![Partition { start_index: 0, num_results: 3 }]
        );
    }

    #[test]
    fn test_exact_split() {
        let partitions = plan(4, 20, 0).unwrap();
        assert_eq!(partitions.len(), 4);
        assert!(partitions.iter().all(|p| p.num_results == 5));
        assert_invariants(&partitions, 20, 0);
    }

    #[test]
    fn test_nonzero_start_index() {
        let partitions = plan(3, 10, 7).unwrap();
        assert_eq!(partitions[0].start_index, 7);
        assert_invariants(&partitions, 10, 7);
    }

    #[test]
    fn test_invariants_hold_across_inputs() {
        for threads in 1..=8 {
            for num_results in 1..=40 {
                for start_index in [0, 1, 13] {
                    let partitions = plan(threads, num_results, start_index).unwrap();
                    assert_invariants(&partitions, num_results, start_index);
                }
            }
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(plan(0, 10, 0), Err(Error::Planning(_))));
        assert!(matches!(plan(3, 0, 0), Err(Error::Planning(_))));
    }
}
