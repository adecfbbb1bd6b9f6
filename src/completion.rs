//! The seam between the conversation controller and the network.

use crate::error::Result;

/// Turns one question into one answer.
///
/// Implementations hold no conversational state between calls; every call is
/// independent and is attempted exactly once.
#[async_trait::async_trait]
pub trait Completion: Send + Sync {
    /// Returns the answer text for `question`.
    ///
    /// Empty questions are forwarded unchanged.
    async fn complete(&self, question: &str) -> Result<String>;
}
