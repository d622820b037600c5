#[path = "consensus/types.rs"]
mod types;

#[path = "consensus/aggregate.rs"]
mod aggregate;

#[path = "consensus/evaluator.rs"]
mod evaluator;


pub use aggregate::aggregate;
pub use evaluator::{ConsensusEvaluator, DEFAULT_SAMPLE_COUNT};
pub use types::{ConsensusOutcome, ExecutionMode};
