use std::sync::Arc;

use teloxide::types::Message;

use quizbot_core::{
    domain::{ChatId, UserId},
    messaging::types::StartCommand,
    welcome, Result,
};

use crate::router::BotContext;

const FALLBACK_DISPLAY_NAME: &str = "there";

/// Command name without the slash or `@botname` suffix, lowercased.
/// Deep-link payloads after the command are ignored.
fn parse_command(text: &str) -> String {
    let first = text.split_whitespace().next().unwrap_or("");
    first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase()
}

fn start_command(msg: &Message) -> StartCommand {
    let user = msg.from();
    let display_name = user
        .map(|u| u.first_name.clone())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string());

    StartCommand {
        chat_id: ChatId(msg.chat.id.0),
        user_id: user.map(|u| UserId(u.id.0 as i64)),
        display_name,
    }
}

pub async fn handle_command(msg: Message, ctx: Arc<BotContext>) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let cmd = parse_command(text);
    match cmd.as_str() {
        "start" => {
            let start = start_command(&msg);
            welcome::greet(ctx.messenger.as_ref(), &ctx.welcome, &start).await?;
        }
        other => {
            tracing::debug!(chat_id = msg.chat.id.0, "ignoring command /{other}");
        }
    }

    Ok(())
}
