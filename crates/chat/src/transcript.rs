use crate::message::Message;

/// Ordered, append-only message sequence for one session.
///
/// Insertion order is chronological order; the store never reorders. Only
/// the owning conversation state machine mutates a transcript (single-writer
/// invariant), so no concurrent-mutation protection is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Adds a message to the end and returns the updated sequence.
    ///
    /// Never fails.
    pub fn append(&mut self, message: Message) -> &[Message] {
        self.messages.push(message);
        &self.messages
    }

    /// Replaces the entire sequence with `seed`.
    ///
    /// Used for the initial welcome seed and the post-clear reseed.
    pub fn reset(&mut self, seed: Vec<Message>) {
        self.messages = seed;
    }

    /// Read-only view of the current ordered sequence.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
