//! Session-organized chat.
//!
//! This module holds the state manager layered over the completion client
//! and the pieces of the terminal front end built on it:
//!
//! - [`interaction`] and [`session`]: the immutable question/answer record
//!   and the titled, append-only log of them
//! - [`store`]: archived sessions plus the current one
//! - [`controller`]: the operations a user can perform and the view flags
//! - [`config`], [`commands`], [`render`]: CLI arguments, slash commands and
//!   terminal output

pub mod commands;
pub mod config;
pub mod controller;
pub mod interaction;
pub mod render;
pub mod session;
pub mod store;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use controller::{
    APOLOGY, AskTicket, ControllerStats, ConversationController, LOADING_PLACEHOLDER,
};
pub use interaction::{Interaction, format_timestamp};
pub use render::{PlainTextRenderer, Renderer};
pub use session::{DEFAULT_SENDER, Session, TITLE_CHARS, Welcome, derive_title};
pub use store::SessionStore;
