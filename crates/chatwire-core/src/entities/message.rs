//! Message entity - a chat message mirrored into a channel's store

use chrono::{DateTime, Utc};

use crate::collections::Keyed;
use crate::value_objects::Snowflake;

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub tts: bool,
    pub mentions: Vec<Snowflake>,
    pub everyone_mentioned: bool,
}

impl Message {
    /// Create a new Message
    pub fn new(
        id: Snowflake,
        channel_id: Snowflake,
        author_id: Snowflake,
        content: String,
    ) -> Self {
        Self {
            id,
            channel_id,
            author_id,
            content,
            timestamp: Utc::now(),
            edited_at: None,
            tts: false,
            mentions: Vec::new(),
            everyone_mentioned: false,
        }
    }

    /// Check if message has been edited
    #[inline]
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    /// Check whether the message mentions a user
    #[inline]
    pub fn mentions_user(&self, user_id: Snowflake) -> bool {
        self.everyone_mentioned || self.mentions.contains(&user_id)
    }

    /// Merge a partial update payload over this message
    ///
    /// Fields absent from the patch inherit the prior value; fields present
    /// overwrite it. The identity triple (id, channel, author) is only
    /// replaced when the patch carries a new author.
    #[must_use]
    pub fn merged_with(&self, patch: MessagePatch) -> Message {
        Message {
            id: self.id,
            channel_id: self.channel_id,
            author_id: patch.author_id.unwrap_or(self.author_id),
            content: patch.content.unwrap_or_else(|| self.content.clone()),
            timestamp: patch.timestamp.unwrap_or(self.timestamp),
            edited_at: patch.edited_at.or(self.edited_at),
            tts: patch.tts.unwrap_or(self.tts),
            mentions: patch.mentions.unwrap_or_else(|| self.mentions.clone()),
            everyone_mentioned: patch.everyone_mentioned.unwrap_or(self.everyone_mentioned),
        }
    }

    /// Get a truncated preview of the message (for diagnostics)
    pub fn preview(&self, max_len: usize) -> &str {
        if self.content.len() <= max_len {
            &self.content
        } else {
            let mut end = max_len;
            while !self.content.is_char_boundary(end) && end > 0 {
                end -= 1;
            }
            &self.content[..end]
        }
    }
}

impl Keyed for Message {
    fn key(&self) -> Snowflake {
        self.id
    }
}

/// Partial message fields carried by an update event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePatch {
    pub author_id: Option<Snowflake>,
    pub content: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub edited_at: Option<DateTime<Utc>>,
    pub tts: Option<bool>,
    pub mentions: Option<Vec<Snowflake>>,
    pub everyone_mentioned: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> Message {
        let mut msg = Message::new(
            Snowflake::new(100),
            Snowflake::new(10),
            Snowflake::new(1),
            "hello".to_string(),
        );
        msg.tts = true;
        msg.mentions = vec![Snowflake::new(2)];
        msg
    }

    #[test]
    fn test_merge_retains_absent_fields() {
        let original = message();
        let merged = original.merged_with(MessagePatch {
            content: Some("edited".to_string()),
            ..MessagePatch::default()
        });

        assert_eq!(merged.content, "edited");
        assert!(merged.tts);
        assert_eq!(merged.mentions, vec![Snowflake::new(2)]);
        assert_eq!(merged.timestamp, original.timestamp);
    }

    #[test]
    fn test_merge_overwrites_present_fields() {
        let merged = message().merged_with(MessagePatch {
            tts: Some(false),
            mentions: Some(vec![]),
            ..MessagePatch::default()
        });

        assert!(!merged.tts);
        assert!(merged.mentions.is_empty());
        assert_eq!(merged.content, "hello");
    }

    #[test]
    fn test_mentions_user() {
        let msg = message();
        assert!(msg.mentions_user(Snowflake::new(2)));
        assert!(!msg.mentions_user(Snowflake::new(3)));

        let mut everyone = message();
        everyone.everyone_mentioned = true;
        assert!(everyone.mentions_user(Snowflake::new(3)));
    }

    #[test]
    fn test_message_preview() {
        let msg = message();
        assert_eq!(msg.preview(3), "hel");
        assert_eq!(msg.preview(100), "hello");
    }
}
