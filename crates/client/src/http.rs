use std::time::Duration;

use snafu::ResultExt;

use folio_chat::{Message, SessionId};

use crate::protocol::{
    AssistantClient, BoxFuture, ClearHistoryRequest, ClientResult, DecodeSnafu, HistoryExchange,
    NetworkSnafu, SendMessageRequest, SendMessageResponse, ServiceSnafu,
};

/// Default bound on one outbound request.
///
/// Without it a request that never resolves would hold the conversation in
/// `Sending` forever; an expired request surfaces as a transport failure and
/// the conversation returns to idle with the fallback message.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP implementation of [`AssistantClient`] against the portfolio backend.
///
/// Holds no mutable state and may be shared across sessions.
#[derive(Debug, Clone)]
pub struct HttpAssistantClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpAssistantClient {
    /// Builds a client for `base_url` with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Builds a client with an explicit request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context(NetworkSnafu {
                stage: "build-http-client",
            })?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

impl AssistantClient for HttpAssistantClient {
    fn send_message<'a>(
        &'a self,
        message: &'a str,
        session_id: SessionId,
    ) -> BoxFuture<'a, ClientResult<String>> {
        Box::pin(async move {
            tracing::debug!(session_id = %session_id, "sending chat message");
            let request = SendMessageRequest {
                message: message.to_string(),
                session_id: session_id.to_string(),
            };

            let response = self
                .http_client
                .post(self.endpoint("chat"))
                .json(&request)
                .send()
                .await
                .context(NetworkSnafu {
                    stage: "send-message",
                })?;

            let status = response.status();
            let body = response.text().await.context(NetworkSnafu {
                stage: "read-send-response",
            })?;
            if !status.is_success() {
                return ServiceSnafu {
                    stage: "send-message-status",
                    status: status.as_u16(),
                    body,
                }
                .fail();
            }

            let payload: SendMessageResponse =
                serde_json::from_str(&body).context(DecodeSnafu {
                    stage: "parse-send-response",
                })?;
            Ok(payload.ai_response)
        })
    }

    fn clear_history<'a>(&'a self, session_id: SessionId) -> BoxFuture<'a, ClientResult<()>> {
        Box::pin(async move {
            tracing::debug!(session_id = %session_id, "clearing remote history");
            let request = ClearHistoryRequest {
                session_id: session_id.to_string(),
            };

            let response = self
                .http_client
                .post(self.endpoint("chat/clear"))
                .json(&request)
                .send()
                .await
                .context(NetworkSnafu {
                    stage: "clear-history",
                })?;

            let status = response.status();
            let body = response.text().await.context(NetworkSnafu {
                stage: "read-clear-response",
            })?;
            if !status.is_success() {
                return ServiceSnafu {
                    stage: "clear-history-status",
                    status: status.as_u16(),
                    body,
                }
                .fail();
            }
            Ok(())
        })
    }

    fn fetch_history<'a>(
        &'a self,
        session_id: SessionId,
    ) -> BoxFuture<'a, ClientResult<Vec<Message>>> {
        Box::pin(async move {
            tracing::debug!(session_id = %session_id, "fetching remote history");
            let response = self
                .http_client
                .get(self.endpoint("chat/history"))
                .query(&[("sessionId", session_id.to_string())])
                .send()
                .await
                .context(NetworkSnafu {
                    stage: "fetch-history",
                })?;

            let status = response.status();
            let body = response.text().await.context(NetworkSnafu {
                stage: "read-history-response",
            })?;
            if !status.is_success() {
                return ServiceSnafu {
                    stage: "fetch-history-status",
                    status: status.as_u16(),
                    body,
                }
                .fail();
            }

            let exchanges: Vec<HistoryExchange> =
                serde_json::from_str(&body).context(DecodeSnafu {
                    stage: "parse-history-response",
                })?;
            Ok(exchanges
                .into_iter()
                .flat_map(HistoryExchange::into_messages)
                .collect())
        })
    }
}
