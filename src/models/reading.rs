use serde::{Deserialize, Serialize};

/// Outcome of a single recognition call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum RecognitionOutcome {
    /// Free text returned by the recognition service
    Text(String),
    /// The call (or image decoding) failed; holds the reason
    Failed(String),
}

/// Recognition result for one source image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecognitionResult {
    pub file_name: String,
    #[serde(flatten)]
    pub outcome: RecognitionOutcome,
}

impl RecognitionResult {
    pub fn text(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            outcome: RecognitionOutcome::Text(text.into()),
        }
    }

    pub fn failed(file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            outcome: RecognitionOutcome::Failed(reason.into()),
        }
    }

    /// Recognized text, if the call succeeded
    pub fn raw_text(&self) -> Option<&str> {
        match &self.outcome {
            RecognitionOutcome::Text(text) => Some(text),
            RecognitionOutcome::Failed(_) => None,
        }
    }

    /// Text shown in the per-run log and the raw data sheet.
    /// Failed calls are reported as "Error".
    pub fn display_text(&self) -> &str {
        self.raw_text().unwrap_or("Error")
    }
}

/// Distinct mileage value with the number of images that produced it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateReading {
    pub mileage: i64,
    pub occurrences: usize,
}

/// Entry/exit pair produced by the reconciler
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconciledPair {
    pub entry: i64,
    pub exit: i64,
    pub difference: i64,
}

impl ReconciledPair {
    pub fn new(entry: i64, exit: i64) -> Self {
        Self {
            entry,
            exit,
            difference: exit - entry,
        }
    }
}

/// Result of the pairing stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "pairs", rename_all = "snake_case")]
pub enum PairingOutcome {
    Paired(Vec<ReconciledPair>),
    /// Fewer than two distinct readings, or no pair survived the sweep
    InsufficientData,
}

impl PairingOutcome {
    pub fn pairs(&self) -> &[ReconciledPair] {
        match self {
            PairingOutcome::Paired(pairs) => pairs,
            PairingOutcome::InsufficientData => &[],
        }
    }
}
