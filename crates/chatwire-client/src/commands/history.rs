//! Message history

use serde_json::Value;

use chatwire_common::{ClientError, ClientResult};
use chatwire_core::{Message, Snowflake};

use crate::resolver::ChannelRef;
use crate::rest::{Endpoints, Method};
use crate::session::Session;

impl Session {
    /// Fetch past messages from a channel-like target
    ///
    /// Every fetched message is folded into the mirror along with its author
    /// and mentioned users; the returned vector holds the cached copies in
    /// the order the remote end listed them.
    pub async fn fetch_history(
        &self,
        target: impl Into<ChannelRef> + Send,
        limit: usize,
        before: Option<Snowflake>,
        after: Option<Snowflake>,
    ) -> ClientResult<Vec<Message>> {
        let token = self.auth()?;
        let channel = self.resolve_channel(target).await?;

        let path = Endpoints::message_history(channel.id, limit, before, after);
        let response = self
            .rest
            .request(Method::Get, &path, Some(&token), None)
            .await?;

        let entries: Vec<Value> = serde_json::from_value(response)
            .map_err(|err| ClientError::Protocol(format!("invalid history payload: {err}")))?;

        let mut messages = Vec::with_capacity(entries.len());
        for entry in entries {
            messages.push(self.fold_message(entry)?);
        }
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::logged_in_session;
    use chatwire_core::Snowflake;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_history_folds_messages() {
        let (session, rest, _push) = logged_in_session().await;
        rest.respond(json!([
            {
                "id": "101",
                "channel_id": "10",
                "author": {"id": "5", "username": "owner"},
                "content": "second",
                "timestamp": "2016-01-01T00:01:00Z"
            },
            {
                "id": "100",
                "channel_id": "10",
                "author": {"id": "7", "username": "carol"},
                "content": "first",
                "timestamp": "2016-01-01T00:00:00Z"
            }
        ]));

        let history = session
            .fetch_history(Snowflake::new(10), 50, None, None)
            .await
            .unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "second");
        assert!(session
            .mirror()
            .get_message(Snowflake::new(10), Snowflake::new(100))
            .is_some());

        let calls = rest.calls.lock();
        assert_eq!(calls.last().unwrap().path, "/channels/10/messages?limit=50");
    }

    #[tokio::test]
    async fn test_fetch_history_passes_paging() {
        let (session, rest, _push) = logged_in_session().await;
        rest.respond(json!([]));

        let history = session
            .fetch_history(Snowflake::new(10), 20, Some(Snowflake::new(100)), None)
            .await
            .unwrap();

        assert!(history.is_empty());
        let calls = rest.calls.lock();
        assert_eq!(
            calls.last().unwrap().path,
            "/channels/10/messages?limit=20&before=100"
        );
    }
}
