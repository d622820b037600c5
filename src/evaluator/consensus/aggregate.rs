use crate::{
    error::GradingError,
    evaluation::{EvaluationRecord, MAX_SCORE},
};

use super::types::ConsensusOutcome;

/// Collapses samples (in issue order) into one consensus record.
///
/// The consensus score is the most frequent sample score; ties go to the
/// tied score seen first. Reasoning, strength and improvement come from the
/// first sample holding the consensus score, so the explanation always
/// belongs to exactly one sample.
pub fn aggregate(
    criterion: &str,
    samples: &[EvaluationRecord],
) -> Result<ConsensusOutcome, GradingError> {
    if samples.is_empty() {
        return Err(GradingError::ConsensusFailure(format!(
            "no samples to aggregate for '{criterion}'"
        )));
    }

    let mut counts = [0usize; MAX_SCORE as usize + 1];
    for sample in samples {
        counts[sample.score.value() as usize] += 1;
    }
    let top = counts.iter().copied().max().unwrap_or_default();

    // First sample whose score reaches the top frequency: this is both the
    // tie-break winner and the source sample.
    let (source_index, source) = samples
        .iter()
        .enumerate()
        .find(|(_, s)| counts[s.score.value() as usize] == top)
        .ok_or_else(|| GradingError::ConsensusFailure("empty vote".to_string()))?;

    let score = source.score;
    let record = EvaluationRecord {
        criterion: criterion.to_string(),
        score,
        reasoning: format!(
            "Consensus score {score} from {top}/{total} evaluations. {reasoning}",
            total = samples.len(),
            reasoning = source.reasoning
        ),
        strength: source.strength.clone(),
        improvement: source.improvement.clone(),
    };

    Ok(ConsensusOutcome {
        record,
        sample_scores: samples.iter().map(|s| s.score).collect(),
        agreeing: top,
        source_index,
    })
}
