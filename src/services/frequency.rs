use crate::models::reading::CandidateReading;
use std::collections::BTreeMap;

/// Collapse repeated mileage values into ascending, distinct candidates.
///
/// Several photos of the same odometer produce the same value; each distinct
/// value appears once, tagged with how many images produced it.
pub fn reduce_readings<I>(values: I) -> Vec<CandidateReading>
where
    I: IntoIterator<Item = i64>,
{
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(mileage, occurrences)| CandidateReading {
            mileage,
            occurrences,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mileages(candidates: &[CandidateReading]) -> Vec<i64> {
        candidates.iter().map(|c| c.mileage).collect()
    }

    #[test]
    fn test_reduce_sorts_and_deduplicates() {
        let candidates = reduce_readings(vec![250, 100, 250, 175, 100, 100]);

        assert_eq!(mileages(&candidates), vec![100, 175, 250]);
        assert_eq!(candidates[0].occurrences, 3);
        assert_eq!(candidates[1].occurrences, 1);
        assert_eq!(candidates[2].occurrences, 2);
    }

    #[test]
    fn test_reduce_empty() {
        assert!(reduce_readings(Vec::new()).is_empty());
    }

    #[test]
    fn test_reduce_output_strictly_ascending() {
        let input = vec![9, 3, 7, 3, 1, 9, 0, 42, 7, 7, 15];
        let candidates = reduce_readings(input);

        assert!(candidates.windows(2).all(|w| w[0].mileage < w[1].mileage));
        let total: usize = candidates.iter().map(|c| c.occurrences).sum();
        assert_eq!(total, 11);
    }

    #[test]
    fn test_reduce_is_idempotent() {
        let once = reduce_readings(vec![500, 120, 500, 80]);
        let twice = reduce_readings(
            once.iter()
                .flat_map(|c| std::iter::repeat(c.mileage).take(c.occurrences)),
        );

        assert_eq!(once, twice);
    }

    #[test]
    fn test_reduce_distinct_values_only() {
        let once = reduce_readings(vec![3, 1, 2]);
        let again = reduce_readings(mileages(&once));

        assert_eq!(mileages(&once), mileages(&again));
    }
}
