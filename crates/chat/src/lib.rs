#![deny(unsafe_code)]

//! Conversation domain for the portfolio assistant widget: typed session and
//! message identity, the append-only transcript store, and the deterministic
//! conversation state machine. No IO lives here; protocol calls happen in
//! the layers that own a [`Conversation`].

/// Deterministic conversation state machine and its transition types.
pub mod conversation;
pub mod ids;
pub mod message;
pub mod transcript;

pub use conversation::{
    Conversation, GenerationId, PendingSend, RequestState, ResolutionRejection, SendOutcome,
    SendResolution, SubmitRejection,
};
pub use ids::{MessageId, SessionId};
pub use message::{Message, Role, SEND_FAILURE_TEXT, WELCOME_TEXT};
pub use transcript::Transcript;
