//! Interactive terminal chat organized into sessions.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage; the key comes from HUSTLEBOT_API_KEY
//! hustlebot
//!
//! # Pick a model and log every request
//! hustlebot --model gemini-1.5-flash --log-file requests.jsonl
//!
//! # Disable colors (useful for piping output)
//! hustlebot --no-color
//! ```
//!
//! # Commands
//!
//! - `/new` - Archive this session and start a new one
//! - `/sessions` - List archived sessions
//! - `/open <n>` - Continue an archived session
//! - `/delete <n>` - Delete an archived session
//! - `/regenerate <n>` - Ask an earlier question again
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use hustlebot::chat::{
    ChatArgs, ChatCommand, ChatConfig, ConversationController, PlainTextRenderer, Renderer,
    help_text, parse_command,
};
use hustlebot::{Completion, Gemini};

const TITLE: &str = "Hustle-Bot";

/// Main entry point for the hustlebot application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("hustlebot [OPTIONS]");
    let config = ChatConfig::from(args);

    let client = config.client()?;
    let mut controller = ConversationController::with_welcome(client, config.welcome.clone());
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    renderer.print_banner(TITLE, &config.model_label);
    renderer.print_info(&format!("Talking to {}", controller.client().model()));
    renderer.print_info("Type /help for commands, /quit to exit\n");

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                let Some(cmd) = parse_command(line) else {
                    controller.set_input(line);
                    ask(&mut controller, &mut renderer, line.to_string()).await;
                    continue;
                };

                match cmd {
                    ChatCommand::Quit => {
                        println!("Hustle on!");
                        break;
                    }
                    ChatCommand::NewSession => {
                        controller.start_new_session();
                        renderer.print_info("Started a new session.");
                        print_history(&controller, &mut renderer);
                    }
                    ChatCommand::ListSessions => {
                        renderer.print_sessions(controller.archived(), controller.store().origin());
                    }
                    ChatCommand::Open(index) => match controller.switch_session(index) {
                        Ok(()) => {
                            renderer.print_info(&format!(
                                "Opened: {}",
                                controller.current().display_title()
                            ));
                            print_history(&controller, &mut renderer);
                        }
                        Err(err) => renderer.print_error(&err.to_string()),
                    },
                    ChatCommand::Delete(index) => match controller.delete_session(index) {
                        Ok(session) => renderer
                            .print_info(&format!("Deleted: {}", session.display_title())),
                        Err(err) => renderer.print_error(&err.to_string()),
                    },
                    ChatCommand::Regenerate(index) => match controller.question_at(index) {
                        Ok(question) => {
                            let question = question.to_string();
                            ask(&mut controller, &mut renderer, question).await;
                        }
                        Err(err) => renderer.print_error(&err.to_string()),
                    },
                    ChatCommand::History => {
                        print_history(&controller, &mut renderer);
                    }
                    ChatCommand::Stats => {
                        print_stats(&controller);
                    }
                    ChatCommand::Help => {
                        for line in help_text().lines() {
                            println!("    {}", line);
                        }
                    }
                    ChatCommand::Invalid(message) => {
                        renderer.print_error(&message);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nHustle on!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

/// Asks `question`, showing the placeholder while the call is outstanding.
///
/// A failed call shows only the apology interaction; the cause goes to the
/// request log.
async fn ask<C: Completion>(
    controller: &mut ConversationController<C>,
    renderer: &mut dyn Renderer,
    question: String,
) {
    let before = controller.current().len();
    let ticket = match controller.begin_ask(question) {
        Ok(ticket) => ticket,
        Err(err) => {
            renderer.print_error(&err.to_string());
            return;
        }
    };
    renderer.print_pending(controller.answer());
    let outcome = controller.client().complete(ticket.question()).await;
    controller.complete_ask(ticket, outcome);
    print_since(controller, renderer, before);
}

/// Prints the interactions appended after the first `before`; this includes
/// the welcome when the first ask seeded it.
fn print_since<C: Completion>(
    controller: &ConversationController<C>,
    renderer: &mut dyn Renderer,
    before: usize,
) {
    for (index, interaction) in controller
        .current()
        .interactions()
        .iter()
        .enumerate()
        .skip(before)
    {
        renderer.print_interaction(index + 1, interaction);
    }
}

fn print_history<C: Completion>(
    controller: &ConversationController<C>,
    renderer: &mut dyn Renderer,
) {
    print_since(controller, renderer, 0);
}

fn print_stats(controller: &ConversationController<Gemini>) {
    let stats = controller.stats();
    println!("    Session Statistics:");
    println!("      Model: {}", controller.client().model());
    println!(
        "      Current session: {}",
        stats.current_title.as_deref().unwrap_or("(untitled)")
    );
    println!("      Interactions: {}", stats.current_interactions);
    println!("      Archived sessions: {}", stats.archived_sessions);
    println!(
        "      Questions asked: {} ({} failed)",
        stats.asks, stats.failures
    );
}
