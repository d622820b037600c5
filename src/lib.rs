//! Rubric-based grading of learner summaries with large language models.
//!
//! A [`ConsensusEvaluator`](evaluator::ConsensusEvaluator) asks the model for
//! several independent evaluations of the same summary, each under a
//! different [`PerspectiveVariant`](rubric::PerspectiveVariant), and reduces
//! them to one [`EvaluationRecord`](evaluation::EvaluationRecord) by majority
//! vote. Ties go to the score seen first; the reasoning of the first sample
//! holding the winning score is carried over.
//!
//! ```no_run
//! use rubric_grader::{
//!     builder::{LLMBackend, LLMBuilder},
//!     rubric::{Criterion, EvaluationRequest},
//! };
//!
//! # async fn run() -> Result<(), rubric_grader::error::GradingError> {
//! let grader = LLMBuilder::new()
//!     .backend(LLMBackend::OpenAI)
//!     .api_key(std::env::var("OPENAI_API_KEY").unwrap_or_default())
//!     .model("gpt-4.1")
//!     .temperature(0.3)
//!     .samples(3)
//!     .build_evaluator()?;
//!
//! let request = EvaluationRequest::for_criterion(
//!     Criterion::ContentCoverage,
//!     "Full chapter text...",
//!     "Expert summary...",
//!     vec!["formative evaluation".into(), "cipp model".into()],
//!     "Learner summary...",
//! );
//! let record = grader.evaluate(&request).await?;
//! println!("{record}");
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod batch;
pub mod builder;
pub mod chat;
pub mod error;
pub mod evaluation;
pub mod evaluator;
pub mod resilient_llm;
pub mod rubric;

pub use error::GradingError;
pub use evaluation::{EvaluationRecord, Score};
pub use evaluator::{ConsensusEvaluator, ExecutionMode, SingleShot};
