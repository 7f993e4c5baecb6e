use reqwest::Url;

use crate::domain::{ChatId, UserId};

/// An inbound `/start` command, reduced to what the reply needs.
#[derive(Clone, Debug)]
pub struct StartCommand {
    pub chat_id: ChatId,
    pub user_id: Option<UserId>,
    pub display_name: String,
}

/// Inline keyboard attached to an outgoing message, one button per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub buttons: Vec<InlineButton>,
}

/// A button that opens a web app inside the messenger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub web_app_url: Url,
}

impl InlineKeyboard {
    pub fn new(buttons: Vec<InlineButton>) -> Self {
        Self { buttons }
    }

    /// Keyboard with a single web-app launch button.
    pub fn web_app(label: impl Into<String>, url: Url) -> Self {
        Self::new(vec![InlineButton {
            label: label.into(),
            web_app_url: url,
        }])
    }
}

/// Persistent per-chat menu shortcut that opens a web app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    pub web_app_url: Url,
}
