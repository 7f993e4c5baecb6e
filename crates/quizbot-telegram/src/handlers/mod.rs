//! Telegram update handlers.
//!
//! Only `/start` is answered; every other message is ignored.

use std::sync::Arc;

use teloxide::types::Message;

use quizbot_core::Result;

use crate::router::BotContext;

mod commands;

pub async fn handle_message(msg: Message, ctx: Arc<BotContext>) -> Result<()> {
    if !msg.text().is_some_and(|t| t.starts_with('/')) {
        return Ok(());
    }
    commands::handle_command(msg, ctx).await
}
