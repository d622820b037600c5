use serde::{Deserialize, Serialize};

use crate::evaluation::EvaluationRecord;

/// Reference material shared by every submission for one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub learning_material: String,
    pub expert_summary: String,
    pub key_concepts: Vec<String>,
}

/// One learner summary to grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub assignment_id: String,
    pub summary: String,
}

/// Result of one (submission, criterion) pair. A failure is recorded as
/// such; no score is invented for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CriterionOutcome {
    Graded(EvaluationRecord),
    Failed { error: String },
}

impl CriterionOutcome {
    pub fn is_graded(&self) -> bool {
        matches!(self, CriterionOutcome::Graded(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionResult {
    /// Criterion key, e.g. `ContentQuality`. Graded entries also carry the
    /// record's own `criterion` label.
    pub key: String,
    #[serde(flatten)]
    pub outcome: CriterionOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionGrades {
    pub submission_id: String,
    pub assignment_id: String,
    pub results: Vec<CriterionResult>,
}

/// Everything produced by one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub graded: usize,
    pub failed: usize,
    pub submissions: Vec<SubmissionGrades>,
}
