use crate::models::reading::{CandidateReading, PairingOutcome, RecognitionResult};
use serde::Serialize;

/// Everything a single mileage run produced
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunReport {
    /// Recognition results in processing order
    pub results: Vec<RecognitionResult>,
    pub candidates: Vec<CandidateReading>,
    pub outcome: PairingOutcome,
    /// The service reported an exhausted quota and the batch stopped early
    pub quota_exhausted: bool,
    /// Images left unprocessed after the batch stopped
    pub skipped: usize,
}

impl RunReport {
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.raw_text().is_none()).count()
    }
}
