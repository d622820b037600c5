//! Evaluation records exchanged with the model and the strict parser that
//! produces them from raw model output.

mod parse;
mod record;
mod score;

pub use parse::{criteria_match, parse_evaluation};
pub use record::EvaluationRecord;
pub use score::{Score, MAX_SCORE, MIN_SCORE};
