use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Content;

/// A single answer proposed by the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated content; absent when generation was stopped for safety.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Why the model stopped generating, e.g. `STOP` or `SAFETY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,

    /// Position of this candidate in the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

/// Feedback on the prompt itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked and no candidates were produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Token accounting for one call.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_token_count: u64,

    /// Tokens across all candidates.
    #[serde(default)]
    pub candidates_token_count: u64,

    /// Prompt plus candidates.
    #[serde(default)]
    pub total_token_count: u64,
}

/// Response envelope of a `generateContent` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate answers, best first.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Present when the prompt itself was judged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token usage for the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Returns `candidates[0].content.parts[0].text`.
    ///
    /// Any missing link in that chain is reported as a serialization error so
    /// that a structurally valid but empty envelope is still a failed call.
    pub fn answer_text(&self) -> Result<&str> {
        let Some(candidate) = self.candidates.first() else {
            let message = match self
                .prompt_feedback
                .as_ref()
                .and_then(|feedback| feedback.block_reason.as_deref())
            {
                Some(reason) => format!("prompt blocked: {reason}"),
                None => "response contained no candidates".to_string(),
            };
            return Err(Error::serialization(message, None));
        };
        candidate
            .content
            .as_ref()
            .and_then(Content::first_text)
            .ok_or_else(|| {
                let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
                Error::serialization(
                    format!("first candidate has no text (finish reason: {reason})"),
                    None,
                )
            })
    }
}
