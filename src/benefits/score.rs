use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Nominal bounds of a Saber Pro global score.
pub const MIN_SCORE: i64 = 0;
pub const MAX_SCORE: i64 = 300;

/// A global exam score.
///
/// Any integer is representable; the classifier walks its ladder literally
/// even for values outside [`MIN_SCORE`, `MAX_SCORE`]. Only text that is not
/// an integer is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(i64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("score is empty")]
    Empty,
    #[error("score '{0}' is not an integer")]
    NotAnInteger(String),
}

impl Score {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    /// Whether the score lies within the nominal exam range.
    pub fn in_nominal_range(self) -> bool {
        (MIN_SCORE..=MAX_SCORE).contains(&self.0)
    }
}

impl From<i64> for Score {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Score {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ScoreError::Empty);
        }
        trimmed
            .parse::<i64>()
            .map(Score)
            .map_err(|_| ScoreError::NotAnInteger(trimmed.to_string()))
    }
}
