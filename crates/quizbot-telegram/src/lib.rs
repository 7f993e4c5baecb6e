//! Telegram adapter (teloxide).
//!
//! This crate implements the `quizbot-core` MessagingPort over the Telegram
//! Bot API and owns the bot session lifecycle.

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, WebAppInfo},
};

pub mod handlers;
pub mod router;

pub use router::{BotPhase, BotSession};

use quizbot_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{InlineKeyboard, MenuButton},
    },
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_inline_keyboard(
        &self,
        chat_id: ChatId,
        html: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef> {
        let rows: Vec<Vec<InlineKeyboardButton>> = keyboard
            .buttons
            .into_iter()
            .map(|b| {
                vec![InlineKeyboardButton::web_app(
                    b.label,
                    WebAppInfo { url: b.web_app_url },
                )]
            })
            .collect();

        let msg = self
            .bot
            .send_message(Self::tg_chat(chat_id), html.to_string())
            .parse_mode(ParseMode::Html)
            .reply_markup(InlineKeyboardMarkup::new(rows))
            .await
            .map_err(Self::map_err)?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn set_menu_button(&self, chat_id: ChatId, button: MenuButton) -> Result<()> {
        self.bot
            .set_chat_menu_button()
            .chat_id(Self::tg_chat(chat_id))
            .menu_button(teloxide::types::MenuButton::WebApp {
                text: button.label,
                web_app: WebAppInfo {
                    url: button.web_app_url,
                },
            })
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}
