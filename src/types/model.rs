use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents a generative-language model identifier.
///
/// This can be a predefined model or a custom string value for models that
/// are newer than this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier
    Custom(String),
}

/// Known Gemini model versions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KnownModel {
    /// Gemini 1.0 Pro, the model the client talks to by default.
    GeminiPro,

    /// Gemini 1.5 Flash
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,

    /// Gemini 1.5 Pro
    #[serde(rename = "gemini-1.5-pro")]
    Gemini15Pro,

    /// Gemini 2.0 Flash
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,
}

impl KnownModel {
    const ALL: [KnownModel; 4] = [
        KnownModel::GeminiPro,
        KnownModel::Gemini15Flash,
        KnownModel::Gemini15Pro,
        KnownModel::Gemini20Flash,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            KnownModel::GeminiPro => "gemini-pro",
            KnownModel::Gemini15Flash => "gemini-1.5-flash",
            KnownModel::Gemini15Pro => "gemini-1.5-pro",
            KnownModel::Gemini20Flash => "gemini-2.0-flash",
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Known(KnownModel::GeminiPro)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    /// Parses a model name, accepting an optional `models/` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let name = name.strip_prefix("models/").unwrap_or(name);
        Ok(KnownModel::ALL
            .iter()
            .find(|known| known.as_str() == name)
            .cloned()
            .map(Model::Known)
            .unwrap_or_else(|| Model::Custom(name.to_string())))
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        Model::Custom(model)
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        Model::Custom(model.to_string())
    }
}
