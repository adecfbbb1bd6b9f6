//! Output rendering for the chat application.
//!
//! A trait-based rendering abstraction so the REPL does not care how
//! interactions and session lists reach the terminal.  Answers are printed as
//! plain text; Markdown is left as the model wrote it.

use std::io::{self, Stdout, Write};

use crate::chat::interaction::Interaction;
use crate::chat::session::Session;

/// ANSI escape code for dim text (timestamps, placeholders).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text.
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (questions).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (banner and titles).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (errors).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print the title banner.
    fn print_banner(&mut self, title: &str, model_label: &str);

    /// Print the placeholder shown while an answer is outstanding.
    fn print_pending(&mut self, placeholder: &str);

    /// Print one interaction; `position` is its 1-based place in the session.
    fn print_interaction(&mut self, position: usize, interaction: &Interaction);

    /// Print the archive list, marking the entry the current session was
    /// opened from.
    fn print_sessions(&mut self, archived: &[Session], open: Option<usize>);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a new PlainTextRenderer on stdout with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer on stdout with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self { out, use_color }
    }

    /// Consumes the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn styled(&self, style: &str, text: &str) -> String {
        if self.use_color {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    fn line(&mut self, text: &str) {
        // Terminal write failures are not actionable mid-conversation.
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl Default for PlainTextRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn print_banner(&mut self, title: &str, model_label: &str) {
        let banner = format!(
            "{} (Model: {model_label})",
            self.styled(ANSI_GREEN, &self.styled(ANSI_BOLD, title))
        );
        self.line(&banner);
    }

    fn print_pending(&mut self, placeholder: &str) {
        let text = self.styled(ANSI_DIM, placeholder);
        self.line(&text);
    }

    fn print_interaction(&mut self, position: usize, interaction: &Interaction) {
        let header = self.styled(
            ANSI_DIM,
            &format!("[{position}] {}", interaction.timestamp()),
        );
        let question = self.styled(ANSI_CYAN, &format!("> {}", interaction.question()));
        self.line(&header);
        self.line(&question);
        self.line(interaction.answer());
        self.line("");
    }

    fn print_sessions(&mut self, archived: &[Session], open: Option<usize>) {
        if archived.is_empty() {
            self.line("No archived sessions.");
            return;
        }
        let heading = self.styled(ANSI_GREEN, "Sessions");
        self.line(&heading);
        for (index, session) in archived.iter().enumerate() {
            let marker = if open == Some(index) { "*" } else { " " };
            self.line(&format!(
                "{marker} {:>3}. {} ({} interactions)",
                index + 1,
                session.display_title(),
                session.len()
            ));
        }
    }

    fn print_error(&mut self, error: &str) {
        let text = self.styled(ANSI_RED, &format!("Error: {error}"));
        self.line(&text);
    }

    fn print_info(&mut self, info: &str) {
        self.line(info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::session::Welcome;

    fn render<F>(use_color: bool, f: F) -> String
    where
        F: FnOnce(&mut PlainTextRenderer<Vec<u8>>),
    {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), use_color);
        f(&mut renderer);
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn interaction_without_color() {
        let interaction = Interaction::with_timestamp("Hello", "Hi there", "3:04:05 PM");
        let output = render(false, |r| r.print_interaction(2, &interaction));
        assert_eq!(output, "[2] 3:04:05 PM\n> Hello\nHi there\n\n");
    }

    #[test]
    fn interaction_with_color_is_styled() {
        let interaction = Interaction::with_timestamp("Hello", "Hi there", "3:04:05 PM");
        let output = render(true, |r| r.print_interaction(1, &interaction));
        assert!(output.contains(ANSI_CYAN));
        assert!(output.contains(ANSI_RESET));
    }

    #[test]
    fn session_list_marks_open_entry() {
        let welcome = Welcome::new("Bot", "hi");
        let sessions = vec![Session::initialize(&welcome), Session::initialize(&welcome)];
        let output = render(false, |r| r.print_sessions(&sessions, Some(1)));
        assert_eq!(
            output,
            "Sessions\n    1. New session (1 interactions)\n*   2. New session (1 interactions)\n"
        );
    }

    #[test]
    fn empty_session_list() {
        let output = render(false, |r| r.print_sessions(&[], None));
        assert_eq!(output, "No archived sessions.\n");
    }

    #[test]
    fn error_prefix() {
        let output = render(false, |r| r.print_error("boom"));
        assert_eq!(output, "Error: boom\n");
    }
}
