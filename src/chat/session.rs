//! Sessions: a title plus an ordered interaction log.

use crate::chat::interaction::Interaction;

/// Sender tag used as the question of the welcome interaction.
pub const DEFAULT_SENDER: &str = "HustleBot";

/// Number of characters of the first question kept in a derived title.
pub const TITLE_CHARS: usize = 30;

const DEFAULT_WELCOME: &str = "\
Yo, hustlers and grinders!

Welcome to the Hustle Zone, where dreams become realities and obstacles get crushed. \
I'm HustlerBot, your virtual motivator and chief hype man, here to guide you on your quest for success.

Buckle up, 'cause this journey is not for the faint of heart. You'll have to outwork the \
competition, stay focused like a laser, and embrace the grind like a boss. But fear not, \
I'll be there every step of the way, dropping knowledge bombs and keeping you pumped.

Together, we'll unlock your potential, turn setbacks into stepping stones, and conquer the \
world, one hustle at a time. So, let's get this party started! Let's hustle hard, hustle \
smart, and make our dreams a reality.

Hustle on, my friends! Let's do this!";

/// The synthetic first interaction of every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Welcome {
    sender: String,
    message: String,
}

impl Welcome {
    /// Creates a welcome from a sender tag and message.
    pub fn new(sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            message: message.into(),
        }
    }

    /// The sender tag.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// The welcome text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// A welcome interaction stamped now.
    pub fn interaction(&self) -> Interaction {
        Interaction::new(self.sender.clone(), self.message.clone())
    }
}

impl Default for Welcome {
    fn default() -> Self {
        Self::new(DEFAULT_SENDER, DEFAULT_WELCOME)
    }
}

/// One conversation.
///
/// The title is assigned once, when the first interaction is recorded, and
/// never changes afterwards.  Interactions are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    title: Option<String>,
    interactions: Vec<Interaction>,
}

impl Session {
    /// An empty, untitled draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh draft holding only the welcome interaction.
    pub fn initialize(welcome: &Welcome) -> Self {
        Self {
            title: None,
            interactions: vec![welcome.interaction()],
        }
    }

    /// The title, once one has been derived.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The title, or a placeholder for untitled drafts.
    pub fn display_title(&self) -> &str {
        self.title().unwrap_or("New session")
    }

    /// Interactions in chronological order.
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// The interaction at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Interaction> {
        self.interactions.get(index)
    }

    /// Number of interactions, welcome included.
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// True when the session has no interactions at all.
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Appends a finalized interaction.
    ///
    /// An empty session is seeded with `welcome` first.  An untitled session
    /// takes its title from the interaction's question; `ordinal` numbers the
    /// fallback title used when that question is empty.
    pub(crate) fn record(
        &mut self,
        interaction: Interaction,
        welcome: &Welcome,
        ordinal: usize,
    ) -> &Interaction {
        if self.interactions.is_empty() {
            self.interactions.push(welcome.interaction());
        }
        if self.title.is_none() {
            self.title = Some(derive_title(interaction.question(), ordinal));
        }
        self.interactions.push(interaction);
        &self.interactions[self.interactions.len() - 1]
    }
}

/// Title for a session whose first question is `question`.
///
/// The first [`TITLE_CHARS`] characters followed by `...`, or `Session N`
/// when the question is empty.
pub fn derive_title(question: &str, ordinal: usize) -> String {
    if question.is_empty() {
        format!("Session {ordinal}")
    } else {
        let prefix: String = question.chars().take(TITLE_CHARS).collect();
        format!("{prefix}...")
    }
}
