use std::fmt;

use crate::content::ContentError;

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Key naming one quiz content file.
///
/// A `TopicId` can only be built through [`TopicId::parse`], so holding one
/// means the value is a single path segment that cannot leave the content
/// directory.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TopicId(String);

impl TopicId {
    pub fn parse(raw: &str) -> std::result::Result<Self, ContentError> {
        if raw.is_empty()
            || raw.contains("..")
            || raw.contains('/')
            || raw.contains('\\')
            || raw.contains('\0')
        {
            return Err(ContentError::InvalidIdentifier);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        for raw in ["os", "unknown_topic", "fitter-2024", "Électricité", "a.b"] {
            let id = TopicId::parse(raw).unwrap();
            assert_eq!(id.as_str(), raw);
        }
    }

    #[test]
    fn rejects_traversal_and_separators() {
        for raw in [
            "..",
            "../../etc/passwd",
            "a..b",
            "os/quiz",
            "/etc/passwd",
            "..\\windows",
            "a\\b",
            "",
            "os\0",
        ] {
            assert!(
                matches!(TopicId::parse(raw), Err(ContentError::InvalidIdentifier)),
                "{raw:?} should be rejected"
            );
        }
    }
}
