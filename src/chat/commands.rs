//! Slash command parsing for the chat application.
//!
//! Input starting with `/` controls sessions; everything else is a question.
//! Positions typed by the user are 1-based and are converted to 0-based
//! indices here.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Archive the current session and start a new one.
    NewSession,

    /// List archived sessions.
    ListSessions,

    /// Make the archived session at this index current.
    Open(usize),

    /// Delete the archived session at this index.
    Delete(usize),

    /// Ask the question of the current session's interaction at this index again.
    Regenerate(usize),

    /// Show every interaction of the current session.
    History,

    /// Display session statistics.
    Stats,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be asked as a question.
///
/// # Examples
///
/// ```
/// # use hustlebot::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/delete 2"), Some(ChatCommand::Delete(1)));
/// assert!(parse_command("How do I get up at 5am?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" => ChatCommand::NewSession,
        "sessions" | "ls" => ChatCommand::ListSessions,
        "open" | "switch" => parse_position(argument, ChatCommand::Open, "/open"),
        "delete" | "rm" => parse_position(argument, ChatCommand::Delete, "/delete"),
        "regenerate" | "regen" => {
            parse_position(argument, ChatCommand::Regenerate, "/regenerate")
        }
        "history" => ChatCommand::History,
        "stats" | "status" => ChatCommand::Stats,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_position<F>(argument: Option<&str>, constructor: F, name: &str) -> ChatCommand
where
    F: Fn(usize) -> ChatCommand,
{
    match argument {
        Some(arg) => match arg.parse::<usize>() {
            Ok(position) if position >= 1 => constructor(position - 1),
            _ => ChatCommand::Invalid(format!("{} expects a position starting at 1", name)),
        },
        None => ChatCommand::Invalid(format!("{} requires a position", name)),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /new                   Archive this session and start a new one
  /sessions              List archived sessions
  /open <n>              Continue archived session n
  /delete <n>            Delete archived session n
  /regenerate <n>        Ask the question of interaction n again
  /history               Show the current session
  /stats                 Show session statistics
  /help                  Show this help message
  /quit                  Exit the chat
Anything else is sent as a question."#
}
