//! Frame builders for integration tests
//!
//! Each builder returns the JSON text of one inbound gateway frame, shaped
//! the way the server emits it.

use serde_json::{json, Value};

/// A dispatch frame carrying an event tag and payload
pub fn dispatch(event: &str, data: Value) -> String {
    json!({"op": 0, "t": event, "s": 1, "d": data}).to_string()
}

/// READY with one server, one direct conversation, and self user 99
///
/// Server 1 "Test" owned by user 5, with text channel 10 "general", role 20,
/// and member 5. Direct conversation 30 with user 7 "carol".
pub fn ready_frame() -> String {
    dispatch(
        "READY",
        json!({
            "heartbeat_interval": 45_000,
            "user": {"id": "99", "username": "me"},
            "guilds": [{
                "id": "1",
                "name": "Test",
                "region": "london",
                "owner_id": "5",
                "channels": [{"id": "10", "name": "general", "type": "text"}],
                "roles": [{"id": "20", "name": "everyone"}],
                "members": [{"user": {"id": "5", "username": "owner"}, "roles": ["20"]}]
            }],
            "private_channels": [
                {"id": "30", "recipient": {"id": "7", "username": "carol"}}
            ]
        }),
    )
}

/// MESSAGE_CREATE in a channel
pub fn message_create(id: &str, channel_id: &str, author_id: &str, content: &str) -> String {
    dispatch(
        "MESSAGE_CREATE",
        json!({
            "id": id,
            "channel_id": channel_id,
            "author": {"id": author_id, "username": "someone"},
            "content": content,
            "timestamp": "2016-01-01T00:00:00Z"
        }),
    )
}

/// MESSAGE_UPDATE changing only the content
pub fn message_update(id: &str, channel_id: &str, content: &str) -> String {
    dispatch(
        "MESSAGE_UPDATE",
        json!({
            "id": id,
            "channel_id": channel_id,
            "content": content,
            "edited_timestamp": "2016-01-01T00:05:00Z"
        }),
    )
}

/// MESSAGE_DELETE for a message
pub fn message_delete(id: &str, channel_id: &str) -> String {
    dispatch("MESSAGE_DELETE", json!({"id": id, "channel_id": channel_id}))
}

/// GUILD_DELETE for a server
pub fn guild_delete(id: &str) -> String {
    dispatch("GUILD_DELETE", json!({"id": id}))
}

/// PRESENCE_UPDATE carrying only status and game
pub fn presence_status(user_id: &str, status: &str) -> String {
    dispatch(
        "PRESENCE_UPDATE",
        json!({"user": {"id": user_id}, "status": status}),
    )
}

/// PRESENCE_UPDATE that renames the user
pub fn presence_rename(user_id: &str, username: &str, status: &str) -> String {
    dispatch(
        "PRESENCE_UPDATE",
        json!({"user": {"id": user_id, "username": username}, "status": status}),
    )
}

/// TYPING_START in a channel
pub fn typing_start(user_id: &str, channel_id: &str) -> String {
    dispatch(
        "TYPING_START",
        json!({"user_id": user_id, "channel_id": channel_id}),
    )
}
