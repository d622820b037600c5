use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "grader",
    about = "Grade learner summaries against a rubric with majority-voted LLM evaluations"
)]
pub struct CliArgs {
    /// TOML configuration file (model, grading, assignments)
    #[arg(long, short = 'c')]
    pub config: PathBuf,
    /// JSON array of submissions: [{"id", "assignment_id", "summary"}]
    #[arg(long, short = 's')]
    pub submissions: PathBuf,
    /// Where to write the JSON report; stdout when omitted
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    /// Samples per (submission, criterion); overrides the config file
    #[arg(long)]
    pub samples: Option<usize>,
    /// Issue samples one at a time instead of concurrently
    #[arg(long)]
    pub sequential: bool,
    /// Grade only these criteria (repeatable)
    #[arg(long = "criterion")]
    pub criteria: Vec<String>,
    /// Abort the run at the first failed evaluation
    #[arg(long)]
    pub fail_fast: bool,
}
