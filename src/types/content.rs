use serde::{Deserialize, Serialize};

/// One piece of a content turn.
///
/// Only text parts are produced or consumed by this crate; parts of other
/// kinds deserialize with `text` left empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Part {
    /// The text of this part.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    /// Creates a text part.
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// A turn of content: the user's question on the way out, a candidate's
/// answer on the way back.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Content {
    /// The parts making up this turn.
    #[serde(default)]
    pub parts: Vec<Part>,

    /// The producer of the content, `user` or `model`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Content {
    /// Creates a single-part text turn with no role.
    pub fn from_text<S: Into<String>>(text: S) -> Self {
        Self {
            parts: vec![Part::text(text)],
            role: None,
        }
    }

    /// Returns the text of the first part, if it is a text part.
    pub fn first_text(&self) -> Option<&str> {
        self.parts.first().and_then(|part| part.text.as_deref())
    }
}
