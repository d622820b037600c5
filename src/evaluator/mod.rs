//! Single-shot model evaluation and the self-consistency consensus built on it.

pub mod consensus;
mod single_shot;

pub use consensus::{
    aggregate, ConsensusEvaluator, ConsensusOutcome, ExecutionMode, DEFAULT_SAMPLE_COUNT,
};
pub use single_shot::{ChatEvaluator, SingleShot};
