use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GradingError;

/// Lowest score on the rubric scale.
pub const MIN_SCORE: u8 = 0;
/// Highest score on the rubric scale.
pub const MAX_SCORE: u8 = 5;

/// A rubric score, guaranteed to lie in `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

impl Score {
    /// Creates a score, rejecting values outside the rubric scale.
    pub fn new(value: u8) -> Result<Self, GradingError> {
        if value > MAX_SCORE {
            return Err(out_of_range(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = GradingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| out_of_range(value))
            .and_then(Score::new)
    }
}

fn out_of_range(value: impl fmt::Display) -> GradingError {
    GradingError::parse(
        format!("score {value} outside {MIN_SCORE}..={MAX_SCORE}"),
        value.to_string(),
    )
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Score {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u8::deserialize(deserializer)?;
        Score::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_scale() {
        for value in MIN_SCORE..=MAX_SCORE {
            assert_eq!(Score::new(value).unwrap().value(), value);
        }
    }

    #[test]
    fn rejects_above_scale() {
        match Score::new(6).unwrap_err() {
            GradingError::ParseError { message, raw_response } => {
                assert_eq!(message, "score 6 outside 0..=5");
                assert_eq!(raw_response, "6");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(Score::try_from(-1).is_err());
        assert!(Score::try_from(300).is_err());
    }

    #[test]
    fn serde_uses_plain_integer() {
        let score = Score::new(4).unwrap();
        assert_eq!(serde_json::to_string(&score).unwrap(), "4");
        let back: Score = serde_json::from_str("4").unwrap();
        assert_eq!(back, score);
        assert!(serde_json::from_str::<Score>("9").is_err());
    }
}
