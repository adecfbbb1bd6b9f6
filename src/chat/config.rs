//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and the resolved
//! [`ChatConfig`] the binary builds its client and controller from.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::chat::session::{DEFAULT_SENDER, Welcome};
use crate::client::Gemini;
use crate::client_logger::JsonLinesLogger;
use crate::error::Result;
use crate::types::Model;

/// Label shown next to the title banner.
const DEFAULT_MODEL_LABEL: &str = "Hustlers 0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Command-line arguments for the hustlebot tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for answers.
    #[arrrg(optional, "Model to use (default: gemini-pro)", "MODEL")]
    pub model: Option<String>,

    /// Override the API base URL.
    #[arrrg(optional, "API base URL", "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout: Option<u64>,

    /// Sender tag of the welcome message.
    #[arrrg(optional, "Name the bot greets you with (default: HustleBot)", "NAME")]
    pub bot_name: Option<String>,

    /// Append a JSON-lines log of every request and response to this file.
    #[arrrg(optional, "Write a JSON-lines request log to PATH", "PATH")]
    pub log_file: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat run.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The model to use for generating answers.
    pub model: Model,

    /// API base URL; `None` uses the public endpoint.
    pub base_url: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// The welcome every new session starts with.
    pub welcome: Welcome,

    /// Label shown in the banner.
    pub model_label: String,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Where to write the request log, if anywhere.
    pub log_file: Option<PathBuf>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-pro
    /// - Timeout: 60 seconds
    /// - Welcome: sent by HustleBot
    /// - Color: enabled
    /// - Request log: disabled
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            welcome: Welcome::default(),
            model_label: DEFAULT_MODEL_LABEL.to_string(),
            use_color: true,
            log_file: None,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the welcome message.
    pub fn with_welcome(mut self, welcome: Welcome) -> Self {
        self.welcome = welcome;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the request log path.
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    /// Builds the completion client this configuration describes.
    ///
    /// The API key is read from the environment.
    pub fn client(&self) -> Result<Gemini> {
        let client = Gemini::with_options(None, self.base_url.clone(), Some(self.timeout))?
            .with_model(self.model.clone());
        match &self.log_file {
            Some(path) => Ok(client.with_logger(Arc::new(JsonLinesLogger::create(path)?))),
            None => Ok(client),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let defaults = ChatConfig::new();
        let model = args
            .model
            .map(|s| s.parse::<Model>().unwrap_or(Model::Custom(s)))
            .unwrap_or(defaults.model.clone());
        let welcome = match args.bot_name {
            Some(name) if name != DEFAULT_SENDER => {
                Welcome::new(name, defaults.welcome.message().to_string())
            }
            _ => defaults.welcome.clone(),
        };

        ChatConfig {
            model,
            base_url: args.base_url,
            timeout: args
                .timeout
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            welcome,
            use_color: !args.no_color,
            log_file: args.log_file.map(PathBuf::from),
            ..defaults
        }
    }
}
