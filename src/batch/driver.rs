use std::collections::HashMap;

use crate::{
    error::GradingError,
    evaluator::ConsensusEvaluator,
    rubric::{Criterion, EvaluationRequest},
};

use super::types::{
    Assignment, BatchReport, CriterionOutcome, CriterionResult, Submission, SubmissionGrades,
};

const PROGRESS_EVERY: usize = 5;

/// Walks submissions x criteria and records one outcome per pair.
pub struct BatchDriver {
    evaluator: ConsensusEvaluator,
    assignments: HashMap<String, Assignment>,
    criteria: Vec<Criterion>,
    fail_fast: bool,
}

impl BatchDriver {
    /// Creates a driver grading every built-in criterion.
    pub fn new(evaluator: ConsensusEvaluator, assignments: Vec<Assignment>) -> Self {
        Self {
            evaluator,
            assignments: assignments
                .into_iter()
                .map(|a| (a.id.clone(), a))
                .collect(),
            criteria: Criterion::ALL.to_vec(),
            fail_fast: false,
        }
    }

    /// Restricts grading to `criteria`, in the given order.
    pub fn criteria(mut self, criteria: Vec<Criterion>) -> Self {
        self.criteria = criteria;
        self
    }

    /// Stop the whole run at the first failed pair instead of recording it.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Grades `submissions` in order. Pairs are evaluated one at a time.
    pub async fn run(&self, submissions: &[Submission]) -> Result<BatchReport, GradingError> {
        let mut report = BatchReport::default();

        for (idx, submission) in submissions.iter().enumerate() {
            let grades = self.grade_submission(submission).await?;
            for result in &grades.results {
                if result.outcome.is_graded() {
                    report.graded += 1;
                } else {
                    report.failed += 1;
                }
            }
            report.submissions.push(grades);

            if idx % PROGRESS_EVERY == 0 {
                log::info!("Evaluating... {idx}/{}", submissions.len());
            }
        }

        log::info!(
            "Batch finished: {} graded, {} failed across {} submissions",
            report.graded,
            report.failed,
            submissions.len()
        );
        Ok(report)
    }

    async fn grade_submission(
        &self,
        submission: &Submission,
    ) -> Result<SubmissionGrades, GradingError> {
        let mut results = Vec::with_capacity(self.criteria.len());

        for criterion in &self.criteria {
            let outcome = match self.grade_pair(submission, *criterion).await {
                Ok(outcome) => outcome,
                Err(err) if self.fail_fast => return Err(err),
                Err(err) => {
                    log::warn!(
                        "submission {} / {}: recording failure: {err}",
                        submission.id,
                        criterion.key()
                    );
                    CriterionOutcome::Failed {
                        error: err.to_string(),
                    }
                }
            };
            results.push(CriterionResult {
                key: criterion.key().to_string(),
                outcome,
            });
        }

        Ok(SubmissionGrades {
            submission_id: submission.id.clone(),
            assignment_id: submission.assignment_id.clone(),
            results,
        })
    }

    async fn grade_pair(
        &self,
        submission: &Submission,
        criterion: Criterion,
    ) -> Result<CriterionOutcome, GradingError> {
        let assignment = self
            .assignments
            .get(&submission.assignment_id)
            .ok_or_else(|| {
                GradingError::ConfigurationError(format!(
                    "Unknown assignment '{}' for submission '{}'",
                    submission.assignment_id, submission.id
                ))
            })?;

        let request = EvaluationRequest::for_criterion(
            criterion,
            assignment.learning_material.as_str(),
            assignment.expert_summary.as_str(),
            assignment.key_concepts.clone(),
            submission.summary.as_str(),
        );
        let record = self.evaluator.evaluate(&request).await?;
        Ok(CriterionOutcome::Graded(record))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        evaluation::{EvaluationRecord, Score},
        evaluator::{ExecutionMode, SingleShot},
    };

    /// Scores 4 everywhere except summaries containing "garbage".
    struct FixedSingleShot;

    #[async_trait]
    impl SingleShot for FixedSingleShot {
        async fn invoke(
            &self,
            instruction: &str,
            criterion: &str,
        ) -> Result<EvaluationRecord, GradingError> {
            if instruction.contains("garbage") {
                return Err(GradingError::parse("not an object", "garbage"));
            }
            Ok(EvaluationRecord {
                criterion: criterion.to_string(),
                score: Score::new(4)?,
                reasoning: "solid".to_string(),
                strength: "clear".to_string(),
                improvement: "add examples".to_string(),
            })
        }
    }

    fn driver() -> BatchDriver {
        let evaluator = ConsensusEvaluator::new(Arc::new(FixedSingleShot))
            .sample_count(3)
            .mode(ExecutionMode::Sequential);
        let assignment = Assignment {
            id: "85".to_string(),
            learning_material: "Chapter 10: Evaluation".to_string(),
            expert_summary: "Evaluation determines merit and worth.".to_string(),
            key_concepts: vec!["cipp model".to_string()],
        };
        BatchDriver::new(evaluator, vec![assignment])
    }

    fn submission(id: &str, assignment_id: &str, summary: &str) -> Submission {
        Submission {
            id: id.to_string(),
            assignment_id: assignment_id.to_string(),
            summary: summary.to_string(),
        }
    }

    #[tokio::test]
    async fn grades_every_criterion() {
        let report = driver()
            .run(&[submission("s1", "85", "Evaluation has many models.")])
            .await
            .unwrap();
        assert_eq!(report.graded, 4);
        assert_eq!(report.failed, 0);

        let keys: Vec<_> = report.submissions[0]
            .results
            .iter()
            .map(|r| r.key.as_str())
            .collect();
        assert_eq!(
            keys,
            ["ContentQuality", "ContentCoverage", "ContentCoherence", "Argument"]
        );
        match &report.submissions[0].results[3].outcome {
            CriterionOutcome::Graded(record) => {
                assert_eq!(record.criterion, "Argument");
                assert_eq!(record.score.value(), 4);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn failures_are_recorded_not_scored() {
        let report = driver()
            .criteria(vec![Criterion::Argument])
            .run(&[
                submission("s1", "85", "garbage"),
                submission("s2", "999", "fine"),
                submission("s3", "85", "fine"),
            ])
            .await
            .unwrap();
        assert_eq!(report.graded, 1);
        assert_eq!(report.failed, 2);
        match &report.submissions[1].results[0].outcome {
            CriterionOutcome::Failed { error } => assert!(error.contains("Unknown assignment")),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn fail_fast_stops_the_run() {
        let err = driver()
            .fail_fast(true)
            .run(&[submission("s1", "85", "garbage")])
            .await
            .unwrap_err();
        assert!(matches!(err, GradingError::ParseError { .. }));
    }

    #[test]
    fn report_serializes_status_tags() {
        let result = CriterionResult {
            key: "Argument".to_string(),
            outcome: CriterionOutcome::Failed {
                error: "boom".to_string(),
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"key": "Argument", "status": "failed", "error": "boom"})
        );
    }

    #[tokio::test]
    async fn graded_report_reads_back() {
        let report = driver()
            .criteria(vec![Criterion::ContentQuality])
            .run(&[submission("s1", "85", "Evaluation has many models.")])
            .await
            .unwrap();

        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json.matches("\"criterion\"").count(), 1);
        let entry = &serde_json::to_value(&report).unwrap()["submissions"][0]["results"][0];
        assert_eq!(entry["key"], "ContentQuality");
        assert_eq!(entry["status"], "graded");
        assert_eq!(entry["criterion"], "Content Quality");
        assert_eq!(entry["score"], 4);

        let back: BatchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
