//! Clue definitions for extracted board data

use serde::{Serialize, Serializer};
use std::fmt;

/// The dollar value printed above a clue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClueValue {
    /// A regular clue worth a fixed amount
    Amount(u32),

    /// A daily double, whose wager is chosen by the contestant
    DailyDouble,
}

impl ClueValue {
    /// Parses a value cell's text, e.g. `"$200"` or `"$1,000"`
    ///
    /// Returns None when the text does not contain an amount.
    pub fn parse_amount(text: &str) -> Option<Self> {
        let digits: String = text
            .trim()
            .trim_start_matches("DD:")
            .chars()
            .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
            .collect();

        if digits.is_empty() {
            return None;
        }

        digits.parse().ok().map(Self::Amount)
    }

    /// Converts the value to its database string representation
    pub fn to_db_string(&self) -> String {
        match self {
            Self::Amount(amount) => amount.to_string(),
            Self::DailyDouble => "daily_double".to_string(),
        }
    }
}

impl fmt::Display for ClueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount(amount) => write!(f, "${}", amount),
            Self::DailyDouble => write!(f, "Daily Double"),
        }
    }
}

impl Serialize for ClueValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Amount(amount) => serializer.serialize_u32(*amount),
            Self::DailyDouble => serializer.serialize_str("daily_double"),
        }
    }
}

/// A single question/answer pair
///
/// Both `question` and `answer` are non-empty; the extractor never builds a
/// clue that is missing either one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clue {
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ClueValue>,
}

impl Clue {
    /// Creates a clue, returning None if the question or answer is blank
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        value: Option<ClueValue>,
    ) -> Option<Self> {
        let question = question.into();
        let answer = answer.into();

        if question.trim().is_empty() || answer.trim().is_empty() {
            return None;
        }

        Some(Self {
            question,
            answer,
            value,
        })
    }
}
