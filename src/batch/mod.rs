//! Grades many submissions across rubric criteria, one consensus call at a time.

mod driver;
mod types;

pub use driver::BatchDriver;
pub use types::{
    Assignment, BatchReport, CriterionOutcome, CriterionResult, Submission, SubmissionGrades,
};
