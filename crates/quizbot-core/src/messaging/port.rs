use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::{InlineKeyboard, MenuButton},
    Result,
};

/// Outbound messaging port.
///
/// Telegram is the only implementation; the welcome flow is written against
/// this trait so it can be exercised without a network connection.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Send an HTML-formatted message with an inline keyboard attached.
    async fn send_inline_keyboard(
        &self,
        chat_id: ChatId,
        html: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef>;

    /// Set the persistent menu button of a single chat.
    async fn set_menu_button(&self, chat_id: ChatId, button: MenuButton) -> Result<()>;
}
