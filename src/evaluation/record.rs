use serde::{Deserialize, Serialize};

use super::score::Score;

/// One scored judgement of a learner summary along a single criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// The rubric dimension that was scored
    pub criterion: String,
    /// Score on the 0-5 rubric scale
    pub score: Score,
    /// Justification for the score
    pub reasoning: String,
    /// A positive aspect of the summary
    pub strength: String,
    /// An actionable suggestion
    pub improvement: String,
}

impl std::fmt::Display for EvaluationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}/5 - {}", self.criterion, self.score, self.reasoning)
    }
}
