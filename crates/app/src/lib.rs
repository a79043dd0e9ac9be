#![deny(unsafe_code)]

//! Host glue for the portfolio assistant: the async [`ChatSession`]
//! controller wiring the conversation state machine to a protocol client,
//! startup settings, and the terminal binary that plays the widget role.

pub mod session;
pub mod settings;

pub use session::ChatSession;
pub use settings::AppSettings;
