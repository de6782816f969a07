//! Direct conversation commands

use serde_json::json;

use chatwire_common::{ClientError, ClientResult};
use chatwire_core::Channel;
use chatwire_gateway::events::DirectChannelData;

use crate::resolver::{resolve_user, UserRef};
use crate::rest::{Endpoints, Method};
use crate::session::Session;

impl Session {
    /// Find or start a direct conversation with a user
    ///
    /// Returns the cached conversation when one exists; otherwise asks the
    /// remote end to open one and caches it.
    pub async fn start_direct(&self, target: impl Into<UserRef> + Send) -> ClientResult<Channel> {
        let token = self.auth()?;
        let user = resolve_user(&self.mirror, target.into())?;

        if let Some(existing) = self.mirror.find_direct_channel_with(user.id) {
            return Ok(existing);
        }

        let body = json!({"recipient_id": user.id});
        let response = self
            .rest
            .request(Method::Post, Endpoints::my_channels(), Some(&token), Some(body))
            .await?;

        let data: DirectChannelData = serde_json::from_value(response)
            .map_err(|err| ClientError::Protocol(format!("invalid channel payload: {err}")))?;

        let recipient = data.recipient.into_user();
        let recipient_id = recipient.id;
        self.mirror.add_user(recipient);
        Ok(self
            .mirror
            .add_direct_channel(Channel::new_direct(data.id, recipient_id)))
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::logged_in_session;
    use chatwire_core::Snowflake;
    use serde_json::json;

    #[tokio::test]
    async fn test_start_direct_reuses_cached_conversation() {
        let (session, rest, _push) = logged_in_session().await;

        // User 7 already has a direct conversation from READY
        let channel = session.start_direct(Snowflake::new(7)).await.unwrap();
        assert_eq!(channel.id, Snowflake::new(30));
        // No network call beyond login and gateway discovery
        assert_eq!(rest.calls.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_start_direct_opens_new_conversation() {
        let (session, rest, _push) = logged_in_session().await;
        rest.respond(json!({"id": "31", "recipient": {"id": "5", "username": "owner"}}));

        let channel = session.start_direct(Snowflake::new(5)).await.unwrap();
        assert_eq!(channel.id, Snowflake::new(31));
        assert_eq!(channel.recipient_id(), Some(Snowflake::new(5)));
        assert!(session.mirror().contains_channel(Snowflake::new(31)));

        let calls = rest.calls.lock();
        assert_eq!(calls.last().unwrap().path, "/users/@me/channels");
    }
}
