//! Message commands

use serde_json::json;

use chatwire_common::{ClientError, ClientResult};
use chatwire_core::{Message, MessagePatch};
use chatwire_gateway::events::MessageData;

use crate::resolver::{resolve_mentions, resolve_message, resolve_string, ChannelRef, ContentRef, MessageRef};
use crate::rest::{Endpoints, Method};
use crate::session::Session;

/// Options for sending a message
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageOptions {
    /// Request text-to-speech playback
    pub tts: bool,
}

/// Options for deleting a message
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteOptions {
    /// Delay the deletion by this many milliseconds
    pub wait_ms: Option<u64>,
}

impl Session {
    /// Send a message to any channel-like target
    ///
    /// Mentions are scanned out of the resolved content. The returned message
    /// is the cached one.
    pub async fn send_message(
        &self,
        target: impl Into<ChannelRef> + Send,
        content: impl Into<ContentRef> + Send,
        options: MessageOptions,
    ) -> ClientResult<Message> {
        let token = self.auth()?;
        let channel = self.resolve_channel(target).await?;
        let content = resolve_string(content.into());
        let mentions = resolve_mentions(&content);

        let body = json!({
            "content": content,
            "mentions": mentions,
            "tts": options.tts,
        });
        let response = self
            .rest
            .request(
                Method::Post,
                &Endpoints::channel_messages(channel.id),
                Some(&token),
                Some(body),
            )
            .await?;

        self.fold_message(response)
    }

    /// Send a file to any channel-like target
    pub async fn send_file(
        &self,
        target: impl Into<ChannelRef> + Send,
        filename: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<Message> {
        let token = self.auth()?;
        let channel = self.resolve_channel(target).await?;

        let response = self
            .rest
            .upload(
                &Endpoints::channel_messages(channel.id),
                Some(&token),
                filename,
                bytes,
            )
            .await?;

        self.fold_message(response)
    }

    /// Replace a message's content
    ///
    /// The edit is merged over the cached message so untouched fields survive.
    pub async fn edit_message(
        &self,
        target: impl Into<MessageRef> + Send,
        content: impl Into<ContentRef> + Send,
    ) -> ClientResult<Message> {
        let token = self.auth()?;
        let message = resolve_message(&self.mirror, target.into())?;
        let content = resolve_string(content.into());
        let mentions = resolve_mentions(&content);

        let body = json!({"content": content, "mentions": mentions});
        let response = self
            .rest
            .request(
                Method::Patch,
                &Endpoints::channel_message(message.channel_id, message.id),
                Some(&token),
                Some(body),
            )
            .await?;

        let data: MessageData = serde_json::from_value(response)
            .map_err(|err| ClientError::Protocol(format!("invalid message payload: {err}")))?;

        let patch = MessagePatch {
            author_id: None,
            content: Some(data.content.clone()),
            timestamp: None,
            edited_at: data.edited_timestamp,
            tts: None,
            mentions: Some(data.mentions.iter().map(|u| u.id).collect()),
            everyone_mentioned: None,
        };
        match self.mirror.merge_message(message.channel_id, message.id, patch) {
            Some((new, _old)) => Ok(new),
            None => {
                let (parsed, _, _) = data.into_parts();
                Ok(parsed)
            }
        }
    }

    /// Delete a message, optionally after a delay
    pub async fn delete_message(
        &self,
        target: impl Into<MessageRef> + Send,
        options: DeleteOptions,
    ) -> ClientResult<()> {
        let token = self.auth()?;
        let message = resolve_message(&self.mirror, target.into())?;

        if let Some(wait_ms) = options.wait_ms {
            tokio::time::sleep(std::time::Duration::from_millis(wait_ms)).await;
        }

        self.rest
            .request(
                Method::Delete,
                &Endpoints::channel_message(message.channel_id, message.id),
                Some(&token),
                None,
            )
            .await?;

        self.mirror.remove_message(message.channel_id, message.id);
        Ok(())
    }

    /// Fold a message response into the mirror, caching author and mentions
    pub(crate) fn fold_message(&self, response: serde_json::Value) -> ClientResult<Message> {
        let data: MessageData = serde_json::from_value(response)
            .map_err(|err| ClientError::Protocol(format!("invalid message payload: {err}")))?;

        let (message, author, mentioned) = data.into_parts();
        self.mirror.add_user(author);
        for user in mentioned {
            self.mirror.add_user(user);
        }
        Ok(self.mirror.add_message(message.clone()).unwrap_or(message))
    }
}

#[cfg(test)]
mod tests {
    use crate::resolver::UserRef;
    use crate::testing::logged_in_session;
    use chatwire_core::Snowflake;
    use serde_json::json;

    fn message_response(id: &str, channel_id: &str, content: &str) -> serde_json::Value {
        json!({
            "id": id,
            "channel_id": channel_id,
            "author": {"id": "99", "username": "me"},
            "content": content,
            "timestamp": "2016-01-01T00:00:00Z",
            "mentions": [{"id": "5", "username": "owner"}]
        })
    }

    #[tokio::test]
    async fn test_send_message_caches_result() {
        let (session, rest, _push) = logged_in_session().await;
        rest.respond(message_response("100", "10", "hi <@5>"));

        let message = session
            .send_message(Snowflake::new(10), "hi <@5>", Default::default())
            .await
            .unwrap();

        assert_eq!(message.id, Snowflake::new(100));
        assert_eq!(message.mentions, vec![Snowflake::new(5)]);
        assert!(session
            .mirror()
            .get_message(Snowflake::new(10), Snowflake::new(100))
            .is_some());

        let calls = rest.calls.lock();
        let call = calls.last().unwrap();
        assert_eq!(call.path, "/channels/10/messages");
        let body = call.body.as_ref().unwrap();
        assert_eq!(body["content"], "hi <@5>");
        assert_eq!(body["mentions"][0], "5");
        assert_eq!(body["tts"], false);
    }

    #[tokio::test]
    async fn test_send_message_to_user_targets_direct_channel() {
        let (session, rest, _push) = logged_in_session().await;
        // User 7 already has conversation 30 cached, so only the send hits the wire
        rest.respond(message_response("101", "30", "psst"));

        let message = session
            .send_message(UserRef::from(Snowflake::new(7)), "psst", Default::default())
            .await
            .unwrap();

        assert_eq!(message.channel_id, Snowflake::new(30));
        let calls = rest.calls.lock();
        assert_eq!(calls.last().unwrap().path, "/channels/30/messages");
    }

    #[tokio::test]
    async fn test_edit_message_merges_over_cached() {
        let (session, rest, _push) = logged_in_session().await;
        rest.respond(message_response("100", "10", "hi"));
        let original = session
            .send_message(Snowflake::new(10), "hi", Default::default())
            .await
            .unwrap();

        rest.respond(json!({
            "id": "100",
            "channel_id": "10",
            "author": {"id": "99", "username": "me"},
            "content": "edited",
            "timestamp": "2016-01-01T00:00:00Z",
            "edited_timestamp": "2016-01-01T00:01:00Z",
            "mentions": []
        }));

        let edited = session.edit_message(original, "edited").await.unwrap();
        assert_eq!(edited.content, "edited");
        assert!(edited.edited_at.is_some());

        let cached = session
            .mirror()
            .get_message(Snowflake::new(10), Snowflake::new(100))
            .unwrap();
        assert_eq!(cached.content, "edited");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_message_honors_wait() {
        let (session, rest, _push) = logged_in_session().await;
        rest.respond(message_response("100", "10", "doomed"));
        let message = session
            .send_message(Snowflake::new(10), "doomed", Default::default())
            .await
            .unwrap();

        rest.respond(json!(null));
        session
            .delete_message(
                message,
                crate::commands::DeleteOptions {
                    wait_ms: Some(60_000),
                },
            )
            .await
            .unwrap();

        assert!(session
            .mirror()
            .get_message(Snowflake::new(10), Snowflake::new(100))
            .is_none());
        let calls = rest.calls.lock();
        assert_eq!(calls.last().unwrap().path, "/channels/10/messages/100");
    }

    #[tokio::test]
    async fn test_send_file_uploads_multipart() {
        let (session, rest, _push) = logged_in_session().await;
        rest.respond(message_response("102", "10", ""));

        let message = session
            .send_file(Snowflake::new(10), "cat.png", vec![1, 2, 3])
            .await
            .unwrap();

        assert_eq!(message.id, Snowflake::new(102));
        let calls = rest.calls.lock();
        let call = calls.last().unwrap();
        assert_eq!(call.path, "/channels/10/messages");
        assert_eq!(call.body.as_ref().unwrap()["filename"], "cat.png");
    }

    #[tokio::test]
    async fn test_send_message_requires_login() {
        let (session, _rest, _push) = logged_in_session().await;
        session.logout().await.unwrap();

        let err = session
            .send_message(Snowflake::new(10), "hi", Default::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_AUTHENTICATED");
    }
}
