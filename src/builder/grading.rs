use crate::evaluator::ExecutionMode;

use super::llm_builder::LLMBuilder;

impl LLMBuilder {
    /// Sets how many samples each consensus evaluation draws.
    pub fn samples(mut self, samples: usize) -> Self {
        self.state.samples = Some(samples);
        self
    }

    /// Sets whether samples run concurrently or one after another.
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.state.execution_mode = Some(mode);
        self
    }
}
