//! Conversation orchestration.
//!
//! [`ConversationController`] owns the [`SessionStore`], the completion
//! client and the transient view flags.  The presentation layer reads state
//! through its accessors and changes it only through its operations.

use crate::chat::interaction::Interaction;
use crate::chat::session::{Session, Welcome};
use crate::chat::store::SessionStore;
use crate::completion::Completion;
use crate::error::{Error, Result};
use crate::observability::{
    CONTROLLER_ASKS, CONTROLLER_BUSY_REJECTIONS, CONTROLLER_COMPLETION_FAILURES,
};

/// Answer recorded when the completion service fails for any reason.
pub const APOLOGY: &str = "Sorry - Something went wrong. Please try again!";

/// Answer text shown while a question is outstanding.
pub const LOADING_PLACEHOLDER: &str = "Loading your answer...";

/// Proof that an ask was begun; redeemed exactly once by
/// [`ConversationController::complete_ask`].
#[derive(Debug)]
#[must_use = "an ask that is never completed leaves the controller in flight"]
pub struct AskTicket {
    question: String,
}

impl AskTicket {
    /// The question to send.
    pub fn question(&self) -> &str {
        &self.question
    }
}

/// Counters describing a controller's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerStats {
    /// Number of archived sessions.
    pub archived_sessions: usize,
    /// Interactions in the current session, welcome included.
    pub current_interactions: usize,
    /// Title of the current session, if assigned.
    pub current_title: Option<String>,
    /// Asks completed so far.
    pub asks: u64,
    /// Asks whose completion failed and were answered with the apology.
    pub failures: u64,
    /// Whether an ask is outstanding.
    pub in_flight: bool,
}

/// Drives sessions from user actions.
pub struct ConversationController<C: Completion> {
    client: C,
    store: SessionStore,
    welcome: Welcome,
    in_flight: bool,
    is_typing: bool,
    input: String,
    answer: String,
    asks: u64,
    failures: u64,
}

impl<C: Completion> ConversationController<C> {
    /// Creates a controller with the default welcome message.
    pub fn new(client: C) -> Self {
        Self::with_welcome(client, Welcome::default())
    }

    /// Creates a controller with a custom welcome message.
    pub fn with_welcome(client: C, welcome: Welcome) -> Self {
        Self {
            client,
            store: SessionStore::new(),
            welcome,
            in_flight: false,
            is_typing: false,
            input: String::new(),
            answer: String::new(),
            asks: 0,
            failures: 0,
        }
    }

    /// The completion client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The welcome every new session starts with.
    pub fn welcome(&self) -> &Welcome {
        &self.welcome
    }

    /// The underlying store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The session receiving new interactions.
    pub fn current(&self) -> &Session {
        self.store.current()
    }

    /// Archived sessions.
    pub fn archived(&self) -> &[Session] {
        self.store.archived()
    }

    /// True while an ask is outstanding.
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// True while the typing indicator should be shown.
    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    /// The latest answer text: the placeholder while in flight, then the
    /// answer or the apology.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// The input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Starts an ask for `question`.
    ///
    /// Fails with [`Error::Busy`] if another ask is outstanding; otherwise
    /// raises the in-flight and typing flags and shows the placeholder.
    pub fn begin_ask(&mut self, question: impl Into<String>) -> Result<AskTicket> {
        if self.in_flight {
            CONTROLLER_BUSY_REJECTIONS.click();
            return Err(Error::busy("an answer is already being generated"));
        }
        CONTROLLER_ASKS.click();
        self.in_flight = true;
        self.is_typing = true;
        self.answer = LOADING_PLACEHOLDER.to_string();
        Ok(AskTicket {
            question: question.into(),
        })
    }

    /// Finalizes an ask with the completion outcome.
    ///
    /// Failures become an interaction answered with [`APOLOGY`].  Either way
    /// the interaction is appended to the current session (seeding the
    /// welcome and title as needed) and the flags and input buffer are
    /// cleared.
    pub fn complete_ask(&mut self, ticket: AskTicket, outcome: Result<String>) -> &Interaction {
        let answer = match outcome {
            Ok(answer) => answer,
            Err(_) => {
                CONTROLLER_COMPLETION_FAILURES.click();
                self.failures += 1;
                APOLOGY.to_string()
            }
        };
        self.asks += 1;
        self.in_flight = false;
        self.is_typing = false;
        self.input.clear();
        self.answer.clone_from(&answer);

        let ordinal = self.store.next_ordinal();
        let interaction = Interaction::new(ticket.question, answer);
        self.store
            .current_mut()
            .record(interaction, &self.welcome, ordinal)
    }

    /// Asks `question` and records the outcome in the current session.
    ///
    /// Completion failures are not errors here; they are recorded as an
    /// apology interaction.  The only error is [`Error::Busy`].
    ///
    /// ```
    /// # use hustlebot::{Completion, Result};
    /// # use hustlebot::chat::ConversationController;
    /// struct Echo;
    ///
    /// #[async_trait::async_trait]
    /// impl Completion for Echo {
    ///     async fn complete(&self, question: &str) -> Result<String> {
    ///         Ok(question.to_uppercase())
    ///     }
    /// }
    ///
    /// # tokio_test::block_on(async {
    /// let mut controller = ConversationController::new(Echo);
    /// let interaction = controller.ask("hustle").await.unwrap();
    /// assert_eq!(interaction.answer(), "HUSTLE");
    /// assert_eq!(controller.current().title(), Some("hustle..."));
    /// # });
    /// ```
    pub async fn ask(&mut self, question: impl Into<String>) -> Result<&Interaction> {
        let ticket = self.begin_ask(question)?;
        let outcome = self.client.complete(ticket.question()).await;
        Ok(self.complete_ask(ticket, outcome))
    }

    /// Asks whatever is in the input buffer.
    pub async fn submit(&mut self) -> Result<&Interaction> {
        let question = self.input.clone();
        self.ask(question).await
    }

    /// Asks the question of the current session's interaction at `index`
    /// again, appending a new interaction.
    pub async fn regenerate(&mut self, index: usize) -> Result<&Interaction> {
        let question = self.question_at(index)?.to_string();
        self.ask(question).await
    }

    /// The question of the current session's interaction at `index`.
    pub fn question_at(&self, index: usize) -> Result<&str> {
        self.store
            .current()
            .get(index)
            .map(Interaction::question)
            .ok_or_else(|| {
                Error::not_found(
                    "no interaction at that position in the current session",
                    Some("interaction".to_string()),
                    Some(index),
                )
            })
    }

    /// Archives the current session if it is non-empty and starts a fresh
    /// one holding only the welcome.
    pub fn start_new_session(&mut self) {
        self.store.start_new(&self.welcome);
    }

    /// Deletes the archived session at `index` and returns it.
    pub fn delete_session(&mut self, index: usize) -> Result<Session> {
        self.store.delete(index)
    }

    /// Makes the archived session at `index` current.
    pub fn switch_session(&mut self, index: usize) -> Result<()> {
        if self.in_flight {
            CONTROLLER_BUSY_REJECTIONS.click();
            return Err(Error::busy(
                "cannot switch sessions while an answer is being generated",
            ));
        }
        self.store.open(index)
    }

    /// A snapshot of the controller's counters.
    pub fn stats(&self) -> ControllerStats {
        ControllerStats {
            archived_sessions: self.store.archived().len(),
            current_interactions: self.store.current().len(),
            current_title: self.store.current().title().map(str::to_string),
            asks: self.asks,
            failures: self.failures,
            in_flight: self.in_flight,
        }
    }
}
