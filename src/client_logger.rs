//! Logging hooks for completion client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows callers to
//! capture every request, response and failure passing through the
//! [`Gemini`](crate::Gemini) client, plus [`JsonLinesLogger`], which appends
//! one JSON object per event to a file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::{Error, Result};
use crate::types::{GenerateContentRequest, GenerateContentResponse, Model};

/// A trait for logging completion client operations.
///
/// Implementations must not fail the call they observe; errors writing the
/// log are theirs to swallow.
///
/// # Example
///
/// ```rust,ignore
/// use hustlebot::{ClientLogger, Error, GenerateContentRequest, GenerateContentResponse, Model};
///
/// struct StderrLogger;
///
/// impl ClientLogger for StderrLogger {
///     fn log_request(&self, model: &Model, request: &GenerateContentRequest) {
///         eprintln!("-> {model}: {request:?}");
///     }
///
///     fn log_response(&self, response: &GenerateContentResponse) {
///         eprintln!("<- {response:?}");
///     }
///
///     fn log_error(&self, error: &Error) {
///         eprintln!("!! {error}");
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent.
    fn log_request(&self, model: &Model, request: &GenerateContentRequest);

    /// Log a successfully decoded response envelope.
    fn log_response(&self, response: &GenerateContentResponse);

    /// Log any failure: transport, HTTP status, or an envelope with no answer.
    fn log_error(&self, error: &Error);
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum LogRecord<'a> {
    Request {
        at: String,
        model: &'a Model,
        body: &'a GenerateContentRequest,
    },
    Response {
        at: String,
        body: &'a GenerateContentResponse,
    },
    Error {
        at: String,
        message: String,
    },
}

/// Appends one JSON object per client event to a file.
pub struct JsonLinesLogger {
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesLogger {
    /// Opens `path` for appending, creating it if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .map_err(|err| Error::io("failed to open request log", err))?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    fn write(&self, record: &LogRecord<'_>) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if serde_json::to_writer(&mut *writer, record).is_ok() {
            let _ = writer.write_all(b"\n");
            let _ = writer.flush();
        }
    }
}

fn now_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339).unwrap_or_else(|_| now.to_string())
}

impl ClientLogger for JsonLinesLogger {
    fn log_request(&self, model: &Model, request: &GenerateContentRequest) {
        self.write(&LogRecord::Request {
            at: now_rfc3339(),
            model,
            body: request,
        });
    }

    fn log_response(&self, response: &GenerateContentResponse) {
        self.write(&LogRecord::Response {
            at: now_rfc3339(),
            body: response,
        });
    }

    fn log_error(&self, error: &Error) {
        self.write(&LogRecord::Error {
            at: now_rfc3339(),
            message: error.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;

    #[test]
    fn writes_one_line_per_event() {
        let path = std::env::temp_dir().join(format!(
            "hustlebot-client-log-{}.jsonl",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let logger = JsonLinesLogger::create(&path).unwrap();
        let model = Model::Known(KnownModel::GeminiPro);
        logger.log_request(&model, &GenerateContentRequest::question("Hello"));
        logger.log_response(&GenerateContentResponse::default());
        logger.log_error(&Error::timeout("too slow", Some(60.0)));
        drop(logger);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["event"], "request");
        assert_eq!(lines[0]["model"], "gemini-pro");
        assert_eq!(lines[0]["body"]["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(lines[1]["event"], "response");
        assert_eq!(lines[2]["event"], "error");
        assert!(
            lines[2]["message"]
                .as_str()
                .unwrap()
                .contains("too slow")
        );

        let _ = std::fs::remove_file(&path);
    }
}
