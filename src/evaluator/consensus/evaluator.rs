use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;

use crate::{
    error::GradingError,
    evaluation::EvaluationRecord,
    rubric::{render_instruction, EvaluationRequest, PerspectiveVariant},
};

use super::aggregate::aggregate;
use super::types::{ConsensusOutcome, ExecutionMode};
use crate::evaluator::SingleShot;

/// Samples drawn per evaluation unless configured otherwise.
pub const DEFAULT_SAMPLE_COUNT: usize = 3;

/// Self-consistency evaluator: samples the single-shot capability several
/// times under rotating perspectives and majority-votes the scores.
#[derive(Clone)]
pub struct ConsensusEvaluator {
    single_shot: Arc<dyn SingleShot>,
    sample_count: usize,
    mode: ExecutionMode,
}

impl ConsensusEvaluator {
    /// Creates a parallel evaluator drawing [`DEFAULT_SAMPLE_COUNT`] samples.
    pub fn new(single_shot: Arc<dyn SingleShot>) -> Self {
        Self {
            single_shot,
            sample_count: DEFAULT_SAMPLE_COUNT,
            mode: ExecutionMode::default(),
        }
    }

    /// Sets the number of samples used by [`ConsensusEvaluator::evaluate`].
    pub fn sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Sets whether samples run concurrently or one after another.
    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn samples(&self) -> usize {
        self.sample_count
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Evaluates `request` with the configured sample count.
    pub async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationRecord, GradingError> {
        self.evaluate_with_samples(request, self.sample_count)
            .await
            .map(|outcome| outcome.record)
    }

    /// Evaluates `request` with `sample_count` samples and returns the vote
    /// details alongside the consensus record.
    ///
    /// Any failed sample fails the whole call; no partial vote is formed.
    pub async fn evaluate_with_samples(
        &self,
        request: &EvaluationRequest,
        sample_count: usize,
    ) -> Result<ConsensusOutcome, GradingError> {
        request.validate()?;
        if sample_count == 0 {
            return Err(GradingError::ConsensusFailure(
                "sample count must be at least 1".to_string(),
            ));
        }

        let start = Instant::now();
        let mut samples = match self.mode {
            ExecutionMode::Parallel => self.sample_parallel(request, sample_count).await?,
            ExecutionMode::Sequential => self.sample_sequential(request, sample_count).await?,
        };
        // Votes are read in issue order, never arrival order.
        samples.sort_by_key(|(index, _)| *index);
        let records: Vec<EvaluationRecord> = samples.into_iter().map(|(_, r)| r).collect();

        let outcome = aggregate(&request.criterion, &records)?;
        log::info!(
            "{}: consensus {} from {}/{} samples {:?} in {} ms",
            request.criterion,
            outcome.record.score,
            outcome.agreeing,
            sample_count,
            outcome
                .sample_scores
                .iter()
                .map(|s| s.value())
                .collect::<Vec<_>>(),
            start.elapsed().as_millis()
        );
        Ok(outcome)
    }

    async fn sample_parallel(
        &self,
        request: &EvaluationRequest,
        sample_count: usize,
    ) -> Result<Vec<(usize, EvaluationRecord)>, GradingError> {
        let futures = (0..sample_count).map(|index| self.sample(request, index));
        // try_join_all drops every pending sample as soon as one fails.
        try_join_all(futures).await
    }

    async fn sample_sequential(
        &self,
        request: &EvaluationRequest,
        sample_count: usize,
    ) -> Result<Vec<(usize, EvaluationRecord)>, GradingError> {
        let mut samples = Vec::with_capacity(sample_count);
        for index in 0..sample_count {
            samples.push(self.sample(request, index).await?);
        }
        Ok(samples)
    }

    async fn sample(
        &self,
        request: &EvaluationRequest,
        index: usize,
    ) -> Result<(usize, EvaluationRecord), GradingError> {
        let perspective = PerspectiveVariant::rotation(index);
        let instruction = render_instruction(request, perspective);
        match self
            .single_shot
            .invoke(&instruction, &request.criterion)
            .await
        {
            Ok(record) => {
                log::debug!(
                    "{} sample {index} ({perspective}) scored {}",
                    request.criterion,
                    record.score
                );
                Ok((index, record))
            }
            Err(err) => {
                log::warn!(
                    "{} sample {index} ({perspective}) failed: {err}",
                    request.criterion
                );
                Err(err)
            }
        }
    }
}
