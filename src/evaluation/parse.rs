use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::GradingError;

use super::record::EvaluationRecord;
use super::score::Score;


/// Wire shape the model is asked to emit. Every key is required; `score`
/// stays untyped so integral strings and floats can be coerced.
#[derive(Deserialize, Debug)]
struct RawEvaluation {
    criterion: String,
    score: Value,
    reasoning: String,
    strength: String,
    improvement: String,
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)```").expect("fence pattern is valid")
    })
}

/// Parses raw model output into an [`EvaluationRecord`] for `requested_criterion`.
///
/// The text may wrap the object in prose or a Markdown code fence. The
/// returned record always carries `requested_criterion` verbatim.
pub fn parse_evaluation(
    raw: &str,
    requested_criterion: &str,
) -> Result<EvaluationRecord, GradingError> {
    let object = extract_object(raw)
        .ok_or_else(|| GradingError::parse("no JSON object found in model output", raw))?;

    let parsed: RawEvaluation = serde_json::from_value(object)
        .map_err(|e| GradingError::parse(format!("evaluation object is malformed: {e}"), raw))?;

    if !criteria_match(&parsed.criterion, requested_criterion) {
        return Err(GradingError::parse(
            format!(
                "model scored criterion '{}' but '{}' was requested",
                parsed.criterion, requested_criterion
            ),
            raw,
        ));
    }

    let score = coerce_score(&parsed.score).map_err(|message| GradingError::parse(message, raw))?;

    if parsed.reasoning.trim().is_empty() {
        return Err(GradingError::parse("reasoning is empty", raw));
    }

    Ok(EvaluationRecord {
        criterion: requested_criterion.to_string(),
        score,
        reasoning: parsed.reasoning,
        strength: parsed.strength,
        improvement: parsed.improvement,
    })
}

/// Compares criterion labels ignoring case, whitespace and punctuation.
pub fn criteria_match(a: &str, b: &str) -> bool {
    let normalize = |s: &str| -> String {
        s.chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect()
    };
    normalize(a) == normalize(b)
}

fn extract_object(raw: &str) -> Option<Value> {
    let text = raw.trim();
    if let Some(fenced) = fence_regex()
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| first_object(m.as_str()))
    {
        return Some(fenced);
    }
    first_object(text)
}

/// Returns the first `{`-anchored slice of `text` that decodes as a JSON object.
fn first_object(text: &str) -> Option<Value> {
    text.match_indices('{').find_map(|(idx, _)| {
        serde_json::Deserializer::from_str(&text[idx..])
            .into_iter::<Value>()
            .next()
            .and_then(Result::ok)
            .filter(Value::is_object)
    })
}

fn coerce_score(value: &Value) -> Result<Score, String> {
    let integral = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral_f64))
            .ok_or_else(|| format!("score {n} is not an integer"))?,
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral_f64))
                .ok_or_else(|| format!("score '{s}' is not an integer"))?
        }
        other => return Err(format!("score has unsupported type: {other}")),
    };
    Score::try_from(integral).map_err(|e| match e {
        GradingError::ParseError { message, .. } => message,
        other => other.to_string(),
    })
}

fn integral_f64(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
