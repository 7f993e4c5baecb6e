//! `/start` reply: menu shortcut + greeting with a web-app launch button.

use reqwest::Url;

use crate::{
    config::Config,
    domain::MessageRef,
    formatting::render_template,
    messaging::{
        port::MessagingPort,
        types::{InlineKeyboard, MenuButton, StartCommand},
    },
    Result,
};

/// Everything the welcome flow reads from configuration.
#[derive(Clone, Debug)]
pub struct WelcomeSettings {
    pub webapp_url: Url,
    pub webapp_button_text: String,
    pub menu_button_text: String,
    pub template: String,
}

impl From<&Config> for WelcomeSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            webapp_url: cfg.webapp_url.clone(),
            webapp_button_text: cfg.webapp_button_text.clone(),
            menu_button_text: cfg.menu_button_text.clone(),
            template: cfg.welcome_template.clone(),
        }
    }
}

impl WelcomeSettings {
    pub fn message_html(&self, display_name: &str) -> String {
        render_template(&self.template, display_name)
    }

    pub fn keyboard(&self) -> InlineKeyboard {
        InlineKeyboard::web_app(self.webapp_button_text.clone(), self.webapp_url.clone())
    }

    pub fn menu_button(&self) -> MenuButton {
        MenuButton {
            label: self.menu_button_text.clone(),
            web_app_url: self.webapp_url.clone(),
        }
    }
}

/// Reply to `/start`.
///
/// The menu shortcut is best-effort: its failure is logged and the greeting
/// is still sent. A failed greeting is returned to the caller untouched.
pub async fn greet(
    messenger: &dyn MessagingPort,
    settings: &WelcomeSettings,
    cmd: &StartCommand,
) -> Result<MessageRef> {
    if let Err(e) = messenger
        .set_menu_button(cmd.chat_id, settings.menu_button())
        .await
    {
        tracing::warn!(chat_id = cmd.chat_id.0, "failed to set menu button: {e}");
    }

    let html = settings.message_html(&cmd.display_name);
    let sent = messenger
        .send_inline_keyboard(cmd.chat_id, &html, settings.keyboard())
        .await?;

    tracing::info!(
        chat_id = cmd.chat_id.0,
        user_id = cmd.user_id.map(|u| u.0),
        "sent welcome message"
    );
    Ok(sent)
}
