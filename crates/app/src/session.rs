use std::sync::Arc;

use tokio::sync::mpsc;

use folio_chat::{Conversation, Message, SendOutcome, SendResolution, SessionId, SubmitRejection};
use folio_client::AssistantClient;

/// Async owner of one conversation: runs the deterministic state machine and
/// performs the protocol IO around it.
///
/// Send workers post generation-tagged resolutions back over a channel and
/// the owner applies them synchronously, so state transitions are never
/// re-entered concurrently with themselves. The suspension points of the
/// core are exactly the two outbound protocol calls.
pub struct ChatSession {
    conversation: Conversation,
    client: Arc<dyn AssistantClient>,
    resolution_tx: mpsc::UnboundedSender<SendResolution>,
    resolution_rx: mpsc::UnboundedReceiver<SendResolution>,
}

impl ChatSession {
    /// Opens a session over `client`, seeding the welcome transcript.
    pub fn open(client: Arc<dyn AssistantClient>) -> Self {
        let (resolution_tx, resolution_rx) = mpsc::unbounded_channel();
        Self {
            conversation: Conversation::open(),
            client,
            resolution_tx,
            resolution_rx,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.conversation.session_id()
    }

    pub fn is_sending(&self) -> bool {
        self.conversation.is_sending()
    }

    /// Read-only view of the transcript for display.
    pub fn transcript(&self) -> &[Message] {
        self.conversation.transcript()
    }

    /// Submits one line of user input.
    ///
    /// On acceptance a worker task performs the protocol send and posts its
    /// resolution for [`ChatSession::resolve_next`] to apply. Rejections are
    /// no-ops by design: nothing was appended and nothing was sent.
    pub fn submit(&mut self, input: &str) -> Result<(), SubmitRejection> {
        let pending = self.conversation.submit(input)?;

        let client = Arc::clone(&self.client);
        let resolution_tx = self.resolution_tx.clone();
        tokio::spawn(async move {
            let outcome = match client
                .send_message(&pending.message, pending.session_id)
                .await
            {
                Ok(reply) => SendOutcome::Reply(reply),
                Err(error) => {
                    tracing::warn!(
                        session_id = %pending.session_id,
                        error = %error,
                        "assistant send failed; resolving with fallback"
                    );
                    SendOutcome::Failed
                }
            };
            // The receiver only goes away when the whole session does.
            let _ = resolution_tx.send(SendResolution {
                generation: pending.generation,
                outcome,
            });
        });

        Ok(())
    }

    /// Waits for the next send resolution and applies it.
    ///
    /// Returns `true` when a message was appended, `false` when the
    /// resolution was discarded because its generation was superseded by a
    /// clear.
    pub async fn resolve_next(&mut self) -> bool {
        let Some(resolution) = self.resolution_rx.recv().await else {
            // Unreachable while the session holds its own sender half.
            return false;
        };
        match self.conversation.resolve(resolution) {
            Ok(()) => true,
            Err(rejection) => {
                tracing::debug!(?rejection, "discarding stale send resolution");
                false
            }
        }
    }

    /// Clears the transcript locally and asks the remote side to forget the
    /// session.
    ///
    /// The local reset always wins: it happens first, unconditionally, and a
    /// remote failure is surfaced as a warning without undoing it.
    pub fn clear(&mut self) {
        self.conversation.clear();

        let client = Arc::clone(&self.client);
        let session_id = self.conversation.session_id();
        tokio::spawn(async move {
            if let Err(error) = client.clear_history(session_id).await {
                tracing::warn!(
                    session_id = %session_id,
                    error = %error,
                    "remote history clear failed; local transcript already reseeded"
                );
            }
        });
    }
}
