use crate::ids::SessionId;
use crate::message::Message;
use crate::transcript::Transcript;

/// Identifier for one transcript generation.
///
/// This must change on every clear so resolutions from a superseded
/// generation can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenerationId(pub u64);

impl GenerationId {
    /// Creates a typed generation identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the identifier of the next generation.
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// In-flight request tracking owned by the conversation.
///
/// At most one send may be outstanding at a time per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Sending(GenerationId),
}

impl RequestState {
    pub fn is_sending(&self) -> bool {
        matches!(self, Self::Sending(_))
    }
}

/// Rejection reason for a submission that must not mutate the transcript.
///
/// Both cases are deliberate no-ops rather than errors: the submission is
/// dropped, not buffered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// Input was empty or whitespace-only after trimming.
    EmptyInput,
    /// A send is already outstanding for this session.
    RequestInFlight,
}

/// Accepted submission, handed to the caller for forwarding to the protocol
/// client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub generation: GenerationId,
    pub session_id: SessionId,
    /// Trimmed text, exactly as appended to the transcript.
    pub message: String,
}

/// Terminal outcome of one protocol send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Reply(String),
    /// Any transport or service failure; the detail stays out of the
    /// transcript.
    Failed,
}

/// Resolution of the send started under `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResolution {
    pub generation: GenerationId,
    pub outcome: SendOutcome,
}

/// Rejection reason for a resolution that must be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionRejection {
    /// The resolution was produced under a generation superseded by a clear.
    StaleGeneration {
        active: GenerationId,
        resolved: GenerationId,
    },
    /// No send is outstanding, so the response belongs to a superseded
    /// transcript.
    NoRequestInFlight,
}

/// One conversation with the assistant: session identity, transcript, and
/// request state, driven as a deterministic state machine.
///
/// All transitions are synchronous. The owner performs protocol IO between
/// [`Conversation::submit`] and [`Conversation::resolve`]; the transcript is
/// never mutated from anywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    session_id: SessionId,
    transcript: Transcript,
    request_state: RequestState,
    generation: GenerationId,
}

impl Conversation {
    /// Opens a conversation: fresh session id, transcript seeded with the
    /// welcome message, idle request state.
    ///
    /// The session id is generated client-side and never validated against
    /// the server before first use; the server creates the session lazily on
    /// first message.
    pub fn open() -> Self {
        let mut transcript = Transcript::new();
        transcript.reset(vec![Message::welcome()]);
        Self {
            session_id: SessionId::generate(),
            transcript,
            request_state: RequestState::Idle,
            generation: GenerationId::new(0),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn request_state(&self) -> RequestState {
        self.request_state
    }

    pub fn is_sending(&self) -> bool {
        self.request_state.is_sending()
    }

    /// Read-only view of the transcript for display.
    pub fn transcript(&self) -> &[Message] {
        self.transcript.snapshot()
    }

    /// Validates and accepts one user submission.
    ///
    /// On acceptance the user message is appended and the state flips to
    /// `Sending` before returning, so a rapid second submission observes the
    /// in-flight request and is dropped rather than racing it.
    pub fn submit(&mut self, input: &str) -> Result<PendingSend, SubmitRejection> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SubmitRejection::EmptyInput);
        }
        if self.request_state.is_sending() {
            return Err(SubmitRejection::RequestInFlight);
        }

        self.transcript.append(Message::user(trimmed));
        self.request_state = RequestState::Sending(self.generation);

        Ok(PendingSend {
            generation: self.generation,
            session_id: self.session_id,
            message: trimmed.to_string(),
        })
    }

    /// Applies the resolution of an outstanding send.
    ///
    /// A resolution is applied only when it matches the generation of the
    /// send currently in flight; anything else belongs to a superseded
    /// transcript and is rejected without mutation.
    pub fn resolve(&mut self, resolution: SendResolution) -> Result<(), ResolutionRejection> {
        let active = match self.request_state {
            RequestState::Sending(active) => active,
            RequestState::Idle => return Err(ResolutionRejection::NoRequestInFlight),
        };
        if active != resolution.generation {
            return Err(ResolutionRejection::StaleGeneration {
                active,
                resolved: resolution.generation,
            });
        }

        let message = match resolution.outcome {
            SendOutcome::Reply(reply) => Message::assistant(reply),
            SendOutcome::Failed => Message::send_failure(),
        };
        self.transcript.append(message);
        self.request_state = RequestState::Idle;
        Ok(())
    }

    /// Clears the transcript and starts a new generation.
    ///
    /// Invokable in any state: an in-flight send keeps running, but its
    /// eventual resolution is rejected by [`Conversation::resolve`]. The
    /// remote side of the clear is the owner's concern and must not block
    /// this local reset.
    pub fn clear(&mut self) {
        self.transcript.reset(vec![Message::welcome()]);
        self.generation = self.generation.next();
        self.request_state = RequestState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Role, SEND_FAILURE_TEXT, WELCOME_TEXT};

    fn reply(generation: GenerationId, text: &str) -> SendResolution {
        SendResolution {
            generation,
            outcome: SendOutcome::Reply(text.to_string()),
        }
    }

    fn contents(conversation: &Conversation) -> Vec<&str> {
        conversation
            .transcript()
            .iter()
            .map(|message| message.content.as_str())
            .collect()
    }

    #[test]
    fn open_seeds_welcome_and_idle_state() {
        let conversation = Conversation::open();
        assert_eq!(contents(&conversation), [WELCOME_TEXT]);
        assert_eq!(conversation.transcript()[0].role, Role::Assistant);
        assert!(!conversation.is_sending());
    }

    #[test]
    fn whitespace_submission_is_a_no_op() {
        let mut conversation = Conversation::open();
        assert_eq!(conversation.submit(""), Err(SubmitRejection::EmptyInput));
        assert_eq!(conversation.submit("   "), Err(SubmitRejection::EmptyInput));
        assert_eq!(contents(&conversation), [WELCOME_TEXT]);
        assert!(!conversation.is_sending());
    }

    #[test]
    fn submit_appends_user_message_and_flips_to_sending() {
        let mut conversation = Conversation::open();
        let pending = conversation
            .submit("What are your skills?")
            .expect("submission accepted");

        assert_eq!(pending.message, "What are your skills?");
        assert_eq!(pending.session_id, conversation.session_id());
        assert_eq!(contents(&conversation), [WELCOME_TEXT, "What are your skills?"]);
        assert_eq!(
            conversation.request_state(),
            RequestState::Sending(pending.generation)
        );
    }

    #[test]
    fn submitted_text_is_trimmed_before_append_and_forward() {
        let mut conversation = Conversation::open();
        let pending = conversation.submit("  hello  ").expect("submission accepted");
        assert_eq!(pending.message, "hello");
        assert_eq!(contents(&conversation), [WELCOME_TEXT, "hello"]);
    }

    #[test]
    fn second_submit_while_sending_is_dropped() {
        let mut conversation = Conversation::open();
        conversation.submit("first").expect("submission accepted");

        assert_eq!(
            conversation.submit("second"),
            Err(SubmitRejection::RequestInFlight)
        );
        assert_eq!(contents(&conversation), [WELCOME_TEXT, "first"]);
    }

    #[test]
    fn successful_sends_interleave_in_submission_order() {
        let mut conversation = Conversation::open();

        let first = conversation.submit("What are your skills?").expect("accepted");
        conversation
            .resolve(reply(first.generation, "I know TypeScript and Python."))
            .expect("resolution applied");

        let second = conversation.submit("Any projects?").expect("accepted");
        conversation
            .resolve(reply(second.generation, "Several, all shipped."))
            .expect("resolution applied");

        assert_eq!(
            contents(&conversation),
            [
                WELCOME_TEXT,
                "What are your skills?",
                "I know TypeScript and Python.",
                "Any projects?",
                "Several, all shipped.",
            ]
        );
        assert!(!conversation.is_sending());
    }

    #[test]
    fn failed_send_appends_single_fallback_and_returns_idle() {
        let mut conversation = Conversation::open();
        let pending = conversation.submit("hello?").expect("accepted");

        conversation
            .resolve(SendResolution {
                generation: pending.generation,
                outcome: SendOutcome::Failed,
            })
            .expect("resolution applied");

        assert_eq!(contents(&conversation), [WELCOME_TEXT, "hello?", SEND_FAILURE_TEXT]);
        assert_eq!(conversation.transcript()[2].role, Role::Assistant);
        assert!(!conversation.is_sending());
    }

    #[test]
    fn clear_reseeds_welcome_and_is_idempotent() {
        let mut conversation = Conversation::open();
        let welcome_id = conversation.transcript()[0].id;

        let pending = conversation.submit("hi").expect("accepted");
        conversation
            .resolve(reply(pending.generation, "hello"))
            .expect("resolution applied");

        conversation.clear();
        assert_eq!(contents(&conversation), [WELCOME_TEXT]);
        assert_eq!(conversation.transcript()[0].id, welcome_id);

        conversation.clear();
        assert_eq!(contents(&conversation), [WELCOME_TEXT]);
        assert_eq!(conversation.transcript()[0].id, welcome_id);
        assert!(!conversation.is_sending());
    }

    #[test]
    fn resolution_landing_after_clear_is_discarded() {
        let mut conversation = Conversation::open();
        let pending = conversation.submit("still out there").expect("accepted");

        conversation.clear();

        assert_eq!(
            conversation.resolve(reply(pending.generation, "too late")),
            Err(ResolutionRejection::NoRequestInFlight)
        );
        assert_eq!(contents(&conversation), [WELCOME_TEXT]);
    }

    #[test]
    fn stale_resolution_does_not_leak_into_the_next_generation() {
        let mut conversation = Conversation::open();
        let stale = conversation.submit("first question").expect("accepted");

        conversation.clear();
        let fresh = conversation.submit("second question").expect("accepted");

        assert_eq!(
            conversation.resolve(reply(stale.generation, "stale reply")),
            Err(ResolutionRejection::StaleGeneration {
                active: fresh.generation,
                resolved: stale.generation,
            })
        );

        conversation
            .resolve(reply(fresh.generation, "fresh reply"))
            .expect("resolution applied");
        assert_eq!(
            contents(&conversation),
            [WELCOME_TEXT, "second question", "fresh reply"]
        );
    }
}
