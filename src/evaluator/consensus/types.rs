use crate::evaluation::{EvaluationRecord, Score};

/// How the samples of one consensus call are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// All samples in flight at once; the first failure cancels the rest.
    #[default]
    Parallel,
    /// One sample at a time; stops at the first failure.
    Sequential,
}

/// Consensus record plus the vote it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusOutcome {
    /// The single record handed back to callers.
    pub record: EvaluationRecord,
    /// Sample scores in issue order.
    pub sample_scores: Vec<Score>,
    /// Number of samples that gave the consensus score.
    pub agreeing: usize,
    /// Issue index of the sample whose text was carried over.
    pub source_index: usize,
}

impl ConsensusOutcome {
    /// Fraction of samples that agreed with the consensus score.
    pub fn agreement(&self) -> f64 {
        if self.sample_scores.is_empty() {
            return 0.0;
        }
        self.agreeing as f64 / self.sample_scores.len() as f64
    }
}
