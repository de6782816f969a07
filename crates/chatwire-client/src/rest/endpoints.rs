//! Endpoint path builders
//!
//! All paths are relative to the configured API base.

use chatwire_core::Snowflake;

/// REST endpoint paths
pub struct Endpoints;

impl Endpoints {
    /// Credential exchange
    #[must_use]
    pub const fn login() -> &'static str {
        "/auth/login"
    }

    /// Session invalidation
    #[must_use]
    pub const fn logout() -> &'static str {
        "/auth/logout"
    }

    /// Push gateway URL discovery
    #[must_use]
    pub const fn gateway() -> &'static str {
        "/gateway"
    }

    /// Server collection
    #[must_use]
    pub const fn servers() -> &'static str {
        "/servers"
    }

    /// A single server
    #[must_use]
    pub fn server(id: Snowflake) -> String {
        format!("/servers/{id}")
    }

    /// The authenticated user's direct conversations
    #[must_use]
    pub const fn my_channels() -> &'static str {
        "/users/@me/channels"
    }

    /// A channel's message collection
    #[must_use]
    pub fn channel_messages(channel_id: Snowflake) -> String {
        format!("/channels/{channel_id}/messages")
    }

    /// A single message
    #[must_use]
    pub fn channel_message(channel_id: Snowflake, message_id: Snowflake) -> String {
        format!("/channels/{channel_id}/messages/{message_id}")
    }

    /// Message history with paging parameters
    #[must_use]
    pub fn message_history(
        channel_id: Snowflake,
        limit: usize,
        before: Option<Snowflake>,
        after: Option<Snowflake>,
    ) -> String {
        let mut path = format!("/channels/{channel_id}/messages?limit={limit}");
        if let Some(before) = before {
            path.push_str(&format!("&before={before}"));
        }
        if let Some(after) = after {
            path.push_str(&format!("&after={after}"));
        }
        path
    }
}
