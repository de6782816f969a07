//! The session's entity caches
//!
//! Four order-preserving stores mirroring remote state: users, servers,
//! server channels, and direct conversations. There is exactly one dispatch
//! path mutating the mirror, so the locks exist for shared read access from
//! command callers, not for concurrent writers.

use parking_lot::RwLock;

use chatwire_core::{Channel, Message, MessagePatch, Server, Snowflake, Store, User};

/// Cache population counts, used for debug notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorStats {
    pub users: usize,
    pub servers: usize,
    pub channels: usize,
    pub direct_channels: usize,
}

/// The single owning set of session caches
#[derive(Debug, Default)]
pub struct StateMirror {
    users: RwLock<Store<User>>,
    servers: RwLock<Store<Server>>,
    channels: RwLock<Store<Channel>>,
    direct_channels: RwLock<Store<Channel>>,
}

impl StateMirror {
    /// Create an empty mirror
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cache population counts
    pub fn stats(&self) -> MirrorStats {
        MirrorStats {
            users: self.users.read().len(),
            servers: self.servers.read().len(),
            channels: self.channels.read().len(),
            direct_channels: self.direct_channels.read().len(),
        }
    }

    // === Users ===

    /// Insert a user if absent; returns a clone of the stored value
    pub fn add_user(&self, user: User) -> User {
        self.users.write().add(user).clone()
    }

    /// Look up a user by identity
    pub fn get_user(&self, id: Snowflake) -> Option<User> {
        self.users.read().get(id).cloned()
    }

    /// Check whether a user is cached
    pub fn contains_user(&self, id: Snowflake) -> bool {
        self.users.read().contains(id)
    }

    /// Replace a cached user in place; silent no-op when absent
    pub fn update_user(&self, id: Snowflake, user: User) -> bool {
        self.users.write().update(id, user)
    }

    /// Remove a user; no-op when absent
    pub fn remove_user(&self, id: Snowflake) -> Option<User> {
        self.users.write().remove(id)
    }

    /// Run a closure against a cached user, mutably
    pub fn with_user_mut<R>(&self, id: Snowflake, f: impl FnOnce(&mut User) -> R) -> Option<R> {
        self.users.write().get_mut(id).map(f)
    }

    // === Servers ===

    /// Insert a server if absent; returns a clone of the stored value
    pub fn add_server(&self, server: Server) -> Server {
        self.servers.write().add(server).clone()
    }

    /// Look up a server by identity
    pub fn get_server(&self, id: Snowflake) -> Option<Server> {
        self.servers.read().get(id).cloned()
    }

    /// Check whether a server is cached
    pub fn contains_server(&self, id: Snowflake) -> bool {
        self.servers.read().contains(id)
    }

    /// Replace a cached server in place; silent no-op when absent
    pub fn update_server(&self, id: Snowflake, server: Server) -> bool {
        self.servers.write().update(id, server)
    }

    /// Run a closure against a cached server, mutably
    pub fn with_server_mut<R>(&self, id: Snowflake, f: impl FnOnce(&mut Server) -> R) -> Option<R> {
        self.servers.write().get_mut(id).map(f)
    }

    /// Remove a server and every channel it owns
    ///
    /// Channels belonging to other servers are untouched. Returns the removed
    /// server and its removed channels in cache order.
    pub fn remove_server_cascade(&self, id: Snowflake) -> Option<(Server, Vec<Channel>)> {
        let server = self.servers.write().remove(id)?;

        let mut removed = Vec::new();
        {
            let mut channels = self.channels.write();
            channels.retain(|ch| {
                if ch.server_id() == Some(id) {
                    removed.push(ch.clone());
                    false
                } else {
                    true
                }
            });
        }

        tracing::debug!(
            server_id = %id,
            removed_channels = removed.len(),
            "Removed server and cascaded channel removal"
        );

        Some((server, removed))
    }

    // === Channels ===

    /// Insert a server-owned channel and attach it to its server's list
    ///
    /// Returns `None` without inserting when the owning server is not cached.
    pub fn insert_server_channel(&self, channel: Channel) -> Option<Channel> {
        let server_id = channel.server_id()?;

        let mut servers = self.servers.write();
        let server = servers.get_mut(server_id)?;
        server.add_channel(channel.id);
        drop(servers);

        Some(self.channels.write().add(channel).clone())
    }

    /// Insert a direct conversation channel; returns a clone of the stored value
    pub fn add_direct_channel(&self, channel: Channel) -> Channel {
        self.direct_channels.write().add(channel).clone()
    }

    /// Look up a channel in the server-channel cache, then the direct cache
    pub fn get_channel(&self, id: Snowflake) -> Option<Channel> {
        if let Some(ch) = self.channels.read().get(id) {
            return Some(ch.clone());
        }
        self.direct_channels.read().get(id).cloned()
    }

    /// Check whether a channel (server or direct) is cached
    pub fn contains_channel(&self, id: Snowflake) -> bool {
        self.channels.read().contains(id) || self.direct_channels.read().contains(id)
    }

    /// Replace a cached channel in place, in whichever cache holds it
    pub fn update_channel(&self, id: Snowflake, channel: Channel) -> bool {
        if self.channels.write().update(id, channel.clone()) {
            return true;
        }
        self.direct_channels.write().update(id, channel)
    }

    /// Remove a channel, detaching it from its owning server's list
    pub fn remove_channel(&self, id: Snowflake) -> Option<Channel> {
        let removed = {
            let mut channels = self.channels.write();
            channels.remove(id)
        };

        let removed = match removed {
            Some(ch) => ch,
            None => self.direct_channels.write().remove(id)?,
        };

        if let Some(server_id) = removed.server_id() {
            if let Some(server) = self.servers.write().get_mut(server_id) {
                server.remove_channel(id);
            }
        }

        Some(removed)
    }

    /// Find an existing direct conversation with a user
    pub fn find_direct_channel_with(&self, user_id: Snowflake) -> Option<Channel> {
        self.direct_channels
            .read()
            .iter()
            .find(|ch| ch.recipient_id() == Some(user_id))
            .cloned()
    }

    /// Run a closure against a cached channel, mutably, searching both caches
    pub fn with_channel_mut<R>(&self, id: Snowflake, f: impl FnOnce(&mut Channel) -> R) -> Option<R> {
        if let Some(ch) = self.channels.write().get_mut(id) {
            return Some(f(ch));
        }
        self.direct_channels.write().get_mut(id).map(f)
    }

    // === Messages ===

    /// Insert a message into its channel's store
    ///
    /// Returns `None` when the channel is not cached; returns a clone of the
    /// stored message otherwise (idempotent on message identity).
    pub fn add_message(&self, message: Message) -> Option<Message> {
        let channel_id = message.channel_id;
        self.with_channel_mut(channel_id, |ch| ch.messages.add(message).clone())
    }

    /// Look up a message within a cached channel
    pub fn get_message(&self, channel_id: Snowflake, message_id: Snowflake) -> Option<Message> {
        self.get_channel(channel_id)
            .and_then(|ch| ch.messages.get(message_id).cloned())
    }

    /// Remove a message from its channel's store
    ///
    /// The message may be absent even when the channel is cached (never
    /// fetched); callers must check channel presence separately.
    pub fn remove_message(&self, channel_id: Snowflake, message_id: Snowflake) -> Option<Message> {
        self.with_channel_mut(channel_id, |ch| ch.messages.remove(message_id))
            .flatten()
    }

    /// Merge a partial payload over a cached message and replace it in place
    ///
    /// Returns `(new, old)` when the message was present.
    pub fn merge_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        patch: MessagePatch,
    ) -> Option<(Message, Message)> {
        self.with_channel_mut(channel_id, |ch| {
            let old = ch.messages.get(message_id).cloned()?;
            let new = old.merged_with(patch);
            ch.messages.update(message_id, new.clone());
            Some((new, old))
        })
        .flatten()
    }
}
