#![deny(unsafe_code)]

//! Assistant protocol client: the [`AssistantClient`] seam, the wire
//! contract of the portfolio backend, and an HTTP implementation over
//! `reqwest`. The client is stateless; transcript ownership stays with the
//! conversation that calls it.

pub mod http;
pub mod protocol;

pub use http::{DEFAULT_REQUEST_TIMEOUT, HttpAssistantClient};
pub use protocol::{
    AssistantClient, BoxFuture, ClearHistoryRequest, ClientError, ClientResult, HistoryExchange,
    SendMessageRequest, SendMessageResponse,
};
