use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use folio::session::ChatSession;
use folio::settings::AppSettings;
use folio_chat::Role;
use folio_client::HttpAssistantClient;

/// Terminal host for the assistant session.
///
/// Plays the widget role: opens one session (which seeds the welcome
/// message), reads lines from stdin, and prints assistant messages as they
/// land. `/clear` resets the conversation, `/quit` or end of input exits.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = AppSettings::load();
    let client = match HttpAssistantClient::with_timeout(
        settings.api_base_url.clone(),
        Duration::from_secs(settings.request_timeout_seconds),
    ) {
        Ok(client) => Arc::new(client),
        Err(error) => {
            tracing::error!(error = %error, "failed to build the assistant client");
            return;
        }
    };

    tracing::info!(base_url = %settings.api_base_url, "assistant session starting");

    let mut session = ChatSession::open(client);
    let mut printed = print_new_assistant_messages(&session, 0);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let Ok(Some(line)) = lines.next_line().await else {
            break;
        };

        match line.trim() {
            "/quit" => break,
            "/clear" => {
                session.clear();
                printed = print_new_assistant_messages(&session, 0);
                continue;
            }
            _ => {}
        }

        if session.submit(&line).is_ok() {
            session.resolve_next().await;
        }
        printed = print_new_assistant_messages(&session, printed);
    }
}

fn prompt() {
    print!("you> ");
    let _ = std::io::stdout().flush();
}

/// Prints assistant messages the user has not seen yet and returns the new
/// high-water mark. User messages are skipped; the terminal already shows
/// what was typed.
fn print_new_assistant_messages(session: &ChatSession, already_printed: usize) -> usize {
    for message in &session.transcript()[already_printed..] {
        if message.role == Role::Assistant {
            println!("assistant> {}", message.content);
        }
    }
    session.transcript().len()
}
