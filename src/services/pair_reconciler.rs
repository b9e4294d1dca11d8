use crate::models::reading::{CandidateReading, PairingOutcome, ReconciledPair};
use tracing::debug;

/// Pair ascending candidate readings into entry/exit records
pub fn reconcile(candidates: &[CandidateReading]) -> PairingOutcome {
    if candidates.len() < 2 {
        return PairingOutcome::InsufficientData;
    }

    let mut working: Vec<i64> = candidates.iter().map(|c| c.mileage).collect();
    let pairs = sweep(&mut working);

    if pairs.is_empty() {
        PairingOutcome::InsufficientData
    } else {
        PairingOutcome::Paired(pairs)
    }
}

/// Single left-to-right sweep over neighbouring values.
///
/// Neighbours that are equal or one apart are the same meter photographed
/// twice: the right-hand value is decremented in place and nothing is emitted.
/// Any other neighbours form a pair. The index advances by one in both cases,
/// so an exit value is reused as the next entry.
pub fn sweep(values: &mut [i64]) -> Vec<ReconciledPair> {
    let mut pairs = Vec::new();
    let mut i = 0;

    while i + 1 < values.len() {
        let km1 = values[i];
        let km2 = values[i + 1];

        if km1 == km2 || (km2 - km1).abs() == 1 {
            values[i + 1] -= 1;
            debug!(
                "[Reconciler] Duplicate reading {} / {} -> corrected to {}",
                km1,
                km2,
                values[i + 1]
            );
        } else {
            pairs.push(ReconciledPair::new(km1, km2));
        }

        i += 1;
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::frequency::reduce_readings;

    fn candidates(values: &[i64]) -> Vec<CandidateReading> {
        values
            .iter()
            .map(|&mileage| CandidateReading {
                mileage,
                occurrences: 1,
            })
            .collect()
    }

    fn triples(outcome: &PairingOutcome) -> Vec<(i64, i64, i64)> {
        outcome
            .pairs()
            .iter()
            .map(|p| (p.entry, p.exit, p.difference))
            .collect()
    }

    #[test]
    fn test_sweep_equal_neighbours_are_corrected() {
        let mut values = vec![100, 100, 250];
        let pairs = sweep(&mut values);

        assert_eq!(values, vec![100, 99, 250]);
        assert_eq!(pairs, vec![ReconciledPair::new(99, 250)]);
        assert_eq!(pairs[0].difference, 151);
    }

    #[test]
    fn test_reconcile_off_by_one_neighbours() {
        let outcome = reconcile(&candidates(&[500, 501, 700]));
        assert_eq!(triples(&outcome), vec![(500, 700, 200)]);
    }

    #[test]
    fn test_reconcile_reuses_exit_as_next_entry() {
        let outcome = reconcile(&candidates(&[100, 300, 500, 700]));
        assert_eq!(
            triples(&outcome),
            vec![(100, 300, 200), (300, 500, 200), (500, 700, 200)]
        );
    }

    #[test]
    fn test_reconcile_empty_and_single() {
        assert_eq!(reconcile(&[]), PairingOutcome::InsufficientData);
        assert_eq!(
            reconcile(&candidates(&[120_000])),
            PairingOutcome::InsufficientData
        );
    }

    #[test]
    fn test_reconcile_only_noise_is_insufficient() {
        // 100/101 collapse into one reading, no pair survives
        assert_eq!(
            reconcile(&candidates(&[100, 101])),
            PairingOutcome::InsufficientData
        );
    }

    #[test]
    fn test_reconcile_chained_corrections() {
        // 10,11 -> 11 becomes 10; 10,12 is a pair
        let outcome = reconcile(&candidates(&[10, 11, 12]));
        assert_eq!(triples(&outcome), vec![(10, 12, 2)]);
    }

    #[test]
    fn test_sweep_correction_can_go_negative() {
        let mut values = vec![0, 0];
        let pairs = sweep(&mut values);

        assert!(pairs.is_empty());
        assert_eq!(values, vec![0, -1]);
    }

    #[test]
    fn test_reconcile_typical_visit_log() {
        // Entry and exit photographed twice each, second shot one unit off
        let readings = vec![45210, 45210, 45211, 45398, 45398, 45399];
        let outcome = reconcile(&reduce_readings(readings));

        // Candidates [45210, 45211, 45398, 45399]:
        // 45210/45211 -> 45211 becomes 45210
        // 45210/45398 -> pair
        // 45398/45399 -> 45399 becomes 45398
        assert_eq!(triples(&outcome), vec![(45210, 45398, 188)]);
    }

    #[test]
    fn test_reconcile_pairs_ascend_by_entry() {
        let outcome = reconcile(&candidates(&[10, 40, 90, 200, 500]));
        let entries: Vec<i64> = outcome.pairs().iter().map(|p| p.entry).collect();

        assert!(entries.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(outcome.pairs().len(), 4);
    }
}
