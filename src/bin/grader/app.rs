use std::fs;
use std::path::Path;

use anyhow::Context;
use rubric_grader::{
    batch::{BatchDriver, Submission},
    builder::{LLMBackend, LLMBuilder},
    evaluator::{ConsensusEvaluator, ExecutionMode},
    rubric::Criterion,
};

use crate::args::CliArgs;
use crate::config::{load_config, resolve_assignments, AppConfig};
use crate::logging::init_logging;

const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let _logger = init_logging(&config.logging)?;

    let base_dir = args.config.parent().unwrap_or_else(|| Path::new("."));
    let assignments = resolve_assignments(&config, base_dir)?;
    let submissions = read_submissions(&args.submissions)?;
    let criteria = select_criteria(&args, &config)?;
    let evaluator = build_evaluator(&args, &config)?;

    log::info!(
        "Grading {} submissions on {} criteria with {} samples each",
        submissions.len(),
        criteria.len(),
        evaluator.samples()
    );

    let driver = BatchDriver::new(evaluator, assignments)
        .criteria(criteria)
        .fail_fast(args.fail_fast || config.grading.fail_fast);
    let report = driver.run(&submissions).await?;

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            log::info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn read_submissions(path: &Path) -> anyhow::Result<Vec<Submission>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let submissions = serde_json::from_str(&content)
        .with_context(|| format!("decoding submissions in {}", path.display()))?;
    Ok(submissions)
}

/// Command-line criteria win over the config file; neither means all four.
fn select_criteria(args: &CliArgs, config: &AppConfig) -> anyhow::Result<Vec<Criterion>> {
    let names = if args.criteria.is_empty() {
        &config.grading.criteria
    } else {
        &args.criteria
    };
    if names.is_empty() {
        return Ok(Criterion::ALL.to_vec());
    }
    let criteria = names
        .iter()
        .map(|name| name.parse::<Criterion>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(criteria)
}

fn build_evaluator(args: &CliArgs, config: &AppConfig) -> anyhow::Result<ConsensusEvaluator> {
    let model = &config.model;
    let backend: LLMBackend = model.backend.parse()?;
    let api_key = match &model.api_key {
        Some(key) => key.clone(),
        None => std::env::var(API_KEY_ENV)
            .with_context(|| format!("no api_key in [model] and {API_KEY_ENV} is not set"))?,
    };

    let mode = if args.sequential || !config.grading.parallel {
        ExecutionMode::Sequential
    } else {
        ExecutionMode::Parallel
    };

    let mut builder = LLMBuilder::new()
        .backend(backend)
        .api_key(api_key)
        .samples(args.samples.unwrap_or(config.grading.samples))
        .execution_mode(mode);

    if let Some(name) = &model.model {
        builder = builder.model(name);
    }
    if let Some(temperature) = model.temperature {
        builder = builder.temperature(temperature);
    }
    if let Some(url) = &model.base_url {
        builder = builder.base_url(url);
    }
    if let Some(timeout) = model.timeout_seconds {
        builder = builder.timeout_seconds(timeout);
    }
    if let Some(max_tokens) = model.max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    if let Some(system) = &model.system {
        builder = builder.system(system);
    }
    if let Some(retry) = &config.retry {
        builder = builder
            .resilient(true)
            .resilient_attempts(retry.max_attempts)
            .resilient_backoff(retry.base_delay_ms, retry.max_delay_ms)
            .resilient_jitter(retry.jitter);
    }

    Ok(builder.build_evaluator()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["grader", "-c", "grader.toml", "-s", "subs.json"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    fn config(body: &str) -> AppConfig {
        toml::from_str(body).unwrap()
    }

    #[test]
    fn all_criteria_by_default() {
        let criteria = select_criteria(&args(&[]), &config("")).unwrap();
        assert_eq!(criteria, Criterion::ALL.to_vec());
    }

    #[test]
    fn command_line_criteria_override_config() {
        let cfg = config("[grading]\ncriteria = [\"argument\"]\n");
        let criteria =
            select_criteria(&args(&["--criterion", "Content Coherence"]), &cfg).unwrap();
        assert_eq!(criteria, vec![Criterion::ContentCoherence]);
    }

    #[test]
    fn unknown_criterion_is_an_error() {
        let err = select_criteria(&args(&["--criterion", "Arguments"]), &config("")).unwrap_err();
        assert!(err.to_string().contains("Arguments"));
    }

    #[test]
    fn flags_override_grading_section() {
        let cfg = config(
            "[model]\napi_key = \"sk-test\"\n[grading]\nsamples = 3\nparallel = true\n",
        );
        let evaluator = build_evaluator(&args(&["--samples", "7", "--sequential"]), &cfg).unwrap();
        assert_eq!(evaluator.samples(), 7);
        assert_eq!(evaluator.execution_mode(), ExecutionMode::Sequential);
    }

    #[test]
    fn zero_retry_attempts_fail_setup() {
        let cfg = config("[model]\napi_key = \"sk-test\"\n[retry]\nmax_attempts = 0\n");
        let Err(err) = build_evaluator(&args(&[]), &cfg) else {
            panic!("called `Result::unwrap_err()` on an `Ok` value");
        };
        assert!(err.to_string().contains("retry attempts"));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let cfg = config("[model]\nbackend = \"bedrock\"\napi_key = \"sk-test\"\n");
        assert!(build_evaluator(&args(&[]), &cfg).is_err());
    }
}
