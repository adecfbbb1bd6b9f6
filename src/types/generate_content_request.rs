use serde::{Deserialize, Serialize};

use crate::types::Content;

/// Body of a `models/{model}:generateContent` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateContentRequest {
    /// The conversation turns sent to the model.
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Creates a request carrying a single question with no prior context.
    pub fn question<S: Into<String>>(question: S) -> Self {
        Self {
            contents: vec![Content::from_text(question)],
        }
    }
}
