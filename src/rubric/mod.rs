//! Rubric criteria, perspective variants and instruction rendering.

mod criterion;
mod perspective;
mod prompt;

pub use criterion::Criterion;
pub use perspective::PerspectiveVariant;
pub use prompt::{render_instruction, EvaluationRequest};
