use blyx_core::chat::reply;
use blyx_core::state::ChatMessage;
use blyx_core::Config;
use chrono::Utc;

use crate::common::{open_store, CliResult};
use crate::render::chat_line;

/// Record the user's message and the helper's reply in the chat log.
pub fn run(message: &str, config: &Config) -> CliResult {
    let message = message.trim();
    if message.is_empty() {
        return Err("message is empty".into());
    }
    let store = open_store(config)?;
    let user = ChatMessage::user(message, Utc::now());
    let answer = ChatMessage::assistant(reply(message), Utc::now());

    println!("{}", chat_line(&user));
    println!("{}", chat_line(&answer));
    store.batch(|store| {
        store.append_chat_message(user);
        store.append_chat_message(answer);
    });
    Ok(())
}
