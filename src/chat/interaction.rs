//! A single question/answer exchange.

use time::OffsetDateTime;
use time::macros::format_description;

/// One question/answer pair with the local time it was finalized.
///
/// Interactions are immutable: there are no setters, and regenerating an
/// answer appends a new interaction instead of editing an old one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    question: String,
    answer: String,
    timestamp: String,
}

impl Interaction {
    /// Creates an interaction stamped with the current local time.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self::with_timestamp(question, answer, format_timestamp(now()))
    }

    /// Creates an interaction with an explicit timestamp string.
    pub fn with_timestamp(
        question: impl Into<String>,
        answer: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            timestamp: timestamp.into(),
        }
    }

    /// The user's question, or the sender tag for a welcome interaction.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// The answer text.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Human-readable local time, e.g. `3:04:05 PM`.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Formats `at` as a 12-hour clock time.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let format = format_description!("[hour repr:12 padding:none]:[minute]:[second] [period]");
    at.format(format).unwrap_or_else(|_| at.time().to_string())
}

fn now() -> OffsetDateTime {
    // The local offset is unavailable on some platforms once threads exist.
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
