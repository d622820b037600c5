use crate::error::GradingError;

use super::criterion::Criterion;
use super::perspective::PerspectiveVariant;

/// Everything needed to grade one learner summary along one criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub criterion: String,
    pub definition: String,
    pub score_guide: String,
    pub learning_material: String,
    pub expert_summary: String,
    /// Rendered in order, joined by commas
    pub key_concepts: Vec<String>,
    pub learner_summary: String,
}

impl EvaluationRequest {
    /// Builds a request whose criterion, definition and score guide come from
    /// the built-in rubric.
    pub fn for_criterion(
        criterion: Criterion,
        learning_material: impl Into<String>,
        expert_summary: impl Into<String>,
        key_concepts: Vec<String>,
        learner_summary: impl Into<String>,
    ) -> Self {
        Self {
            criterion: criterion.name().to_string(),
            definition: criterion.definition().to_string(),
            score_guide: criterion.score_guide().to_string(),
            learning_material: learning_material.into(),
            expert_summary: expert_summary.into(),
            key_concepts,
            learner_summary: learner_summary.into(),
        }
    }

    /// Rejects requests with blank text fields.
    pub fn validate(&self) -> Result<(), GradingError> {
        let fields = [
            ("criterion", &self.criterion),
            ("definition", &self.definition),
            ("score_guide", &self.score_guide),
            ("learning_material", &self.learning_material),
            ("expert_summary", &self.expert_summary),
            ("learner_summary", &self.learner_summary),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(GradingError::InvalidRequest(format!(
                "{name} must not be empty"
            ))),
            None => Ok(()),
        }
    }
}

/// Renders the instruction sent to the model for one sample.
pub fn render_instruction(request: &EvaluationRequest, perspective: PerspectiveVariant) -> String {
    let criterion = &request.criterion;
    format!(
        "You are evaluating a learner's summary based ONLY on **{criterion}**.

Definition:
{definition}

Score Guide:
{score_guide}

1. Think step by step and analyze the learner's summary vs. expert summary and key concepts internally.
2. DO NOT show these reasoning steps.
3. {emphasis}
4. After reasoning, output ONLY JSON in this format:
{{
  \"criterion\": \"{criterion}\",
  \"score\": <integer 0-5>,
  \"reasoning\": \"<summarized reasoning>\",
  \"strength\": \"<strengths>\",
  \"improvement\": \"<actionable improvement suggestion>\"
}}

Inputs:
- Full Material: {material}
- Expert Summary: {expert}
- Key Concepts: {concepts}
- Learner Summary: {learner}
",
        definition = request.definition,
        score_guide = request.score_guide,
        emphasis = perspective.emphasis(),
        material = request.learning_material,
        expert = request.expert_summary,
        concepts = request.key_concepts.join(", "),
        learner = request.learner_summary,
    )
}
