use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

use folio_chat::message::current_unix_timestamp_seconds;
use folio_chat::{Message, MessageId, Role, SessionId};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ClientError {
    #[snafu(display("assistant transport failed on `{stage}`, {source}"))]
    Network {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("assistant service returned status {status} on `{stage}`: {body}"))]
    Service {
        stage: &'static str,
        status: u16,
        body: String,
    },
    #[snafu(display("failed to decode assistant payload on `{stage}`, {source}"))]
    Decode {
        stage: &'static str,
        source: serde_json::Error,
    },
}

/// `POST /chat` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub message: String,
    pub session_id: String,
}

/// `POST /chat` response body; only `aiResponse` is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub ai_response: String,
    #[serde(default)]
    pub user_message: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub session_id: String,
}

/// One stored exchange returned by `GET /chat/history`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryExchange {
    pub user_message: String,
    pub ai_response: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub session_id: String,
}

/// `POST /chat/clear` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearHistoryRequest {
    pub session_id: String,
}

impl HistoryExchange {
    /// Expands one stored exchange into the user message followed by the
    /// assistant message, in transcript order.
    pub fn into_messages(self) -> [Message; 2] {
        let created_at =
            parse_wire_timestamp(&self.timestamp).unwrap_or_else(current_unix_timestamp_seconds);
        [
            Message::new(
                MessageId::generate(),
                Role::User,
                self.user_message,
                created_at,
            ),
            Message::new(
                MessageId::generate(),
                Role::Assistant,
                self.ai_response,
                created_at,
            ),
        ]
    }
}

// The service stamps exchanges with offset-less ISO-8601 (`isoformat()` of a
// naive UTC datetime), with or without a fractional part.
fn parse_wire_timestamp(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    u64::try_from(parsed.and_utc().timestamp()).ok()
}

/// Outbound seam to the remote assistant service.
///
/// Implementations are stateless with respect to the conversation: they
/// receive inputs and return results, holding no transcript of their own,
/// and perform no retries. Trimming and validation happen before a message
/// reaches the client.
pub trait AssistantClient: Send + Sync {
    /// Sends one user message and returns the assistant reply text.
    fn send_message<'a>(
        &'a self,
        message: &'a str,
        session_id: SessionId,
    ) -> BoxFuture<'a, ClientResult<String>>;

    /// Instructs the remote side to discard server-held conversation state.
    ///
    /// Idempotent on the server: clearing an already-empty or unknown
    /// session succeeds.
    fn clear_history<'a>(&'a self, session_id: SessionId) -> BoxFuture<'a, ClientResult<()>>;

    /// Fetches the server-held history as ordered transcript messages.
    ///
    /// Unused by the default conversation flow; available for rehydrating a
    /// transcript after a reload.
    fn fetch_history<'a>(
        &'a self,
        session_id: SessionId,
    ) -> BoxFuture<'a, ClientResult<Vec<Message>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_request_serializes_with_camel_case_keys() {
        let request = SendMessageRequest {
            message: "hi".to_string(),
            session_id: "abc123def".to_string(),
        };
        let value = serde_json::to_value(&request).expect("request serializes");
        assert_eq!(
            value,
            serde_json::json!({"message": "hi", "sessionId": "abc123def"})
        );
    }

    #[test]
    fn send_response_tolerates_missing_optional_fields() {
        let payload: SendMessageResponse =
            serde_json::from_str(r#"{"aiResponse":"hello"}"#).expect("payload decodes");
        assert_eq!(payload.ai_response, "hello");
        assert!(payload.user_message.is_empty());
        assert!(payload.timestamp.is_empty());
    }

    #[test]
    fn history_exchange_expands_to_user_then_assistant() {
        let exchange = HistoryExchange {
            user_message: "what do you build?".to_string(),
            ai_response: "web things".to_string(),
            timestamp: "1970-01-01T00:00:10".to_string(),
            session_id: String::new(),
        };

        let [user, assistant] = exchange.into_messages();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "what do you build?");
        assert_eq!(user.created_at_unix_seconds, 10);
        assert_eq!(assistant.role, Role::Assistant);
        assert_eq!(assistant.content, "web things");
        assert_eq!(assistant.created_at_unix_seconds, 10);
    }

    #[test]
    fn fractional_timestamps_parse_too() {
        assert_eq!(parse_wire_timestamp("1970-01-01T00:01:00.500000"), Some(60));
    }

    #[test]
    fn unparseable_timestamp_falls_back_to_now() {
        let exchange = HistoryExchange {
            user_message: "q".to_string(),
            ai_response: "a".to_string(),
            timestamp: "not-a-date".to_string(),
            session_id: String::new(),
        };

        let [user, assistant] = exchange.into_messages();
        assert!(user.created_at_unix_seconds > 0);
        assert_eq!(user.created_at_unix_seconds, assistant.created_at_unix_seconds);
    }
}
