//! The event dispatcher
//!
//! One dispatcher per session, driven by the single inbound read loop: each
//! frame is fully applied before the next is read, which is what makes cache
//! ordering deterministic. Two rules hold for every event:
//!
//! - the mirror is mutated before the notification is sent, so a listener
//!   re-entering the session observes the post-event state;
//! - an event referencing an entity the mirror does not hold produces one
//!   warning notification and zero mutations, and the session stays live.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use chatwire_cache::{PresenceChange, StateMirror};
use chatwire_core::{Channel, MemberState, Notification, Snowflake};

use crate::connection::{heartbeat, StateHandle};
use crate::events::{
    BanData, ChannelData, GatewayEventType, GuildData, GuildDeleteData, MemberEventData, MessageData,
    MessageDeleteData, MessageUpdateData, PresenceData, ReadyData, RoleDeleteData, RoleEventData,
    TypingData, UserData,
};
use crate::protocol::{GatewayMessage, OpCode};

/// Applies inbound frames to the mirror and emits notifications
pub struct Dispatcher {
    mirror: Arc<StateMirror>,
    state: StateHandle,
    notifier: broadcast::Sender<Notification>,
    outbound: mpsc::Sender<String>,
    typing_quiet_ms: u64,
    heartbeat: Mutex<Option<JoinHandle<()>>>,
    self_id: Mutex<Option<Snowflake>>,
}

impl Dispatcher {
    /// Create a dispatcher wired to a session's mirror, state, and channels
    #[must_use]
    pub fn new(
        mirror: Arc<StateMirror>,
        state: StateHandle,
        notifier: broadcast::Sender<Notification>,
        outbound: mpsc::Sender<String>,
        typing_quiet_ms: u64,
    ) -> Self {
        Self {
            mirror,
            state,
            notifier,
            outbound,
            typing_quiet_ms,
            heartbeat: Mutex::new(None),
            self_id: Mutex::new(None),
        }
    }

    /// The authenticated user's identity, known after READY
    #[must_use]
    pub fn self_id(&self) -> Option<Snowflake> {
        *self.self_id.lock()
    }

    /// Apply one raw inbound frame
    ///
    /// Undecodable frames degrade to a warning; the decoded frame is emitted
    /// as a raw notification before any typed handling.
    pub fn handle_frame(&self, raw: &str) {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => {
                self.warn(format!("undecodable frame: {err}"));
                return;
            }
        };

        self.notify(Notification::Raw(value.clone()));

        let frame: GatewayMessage = match serde_json::from_value(value) {
            Ok(frame) => frame,
            Err(err) => {
                self.warn(format!("malformed frame: {err}"));
                return;
            }
        };

        match frame.op {
            OpCode::Dispatch => self.handle_dispatch(&frame),
            other => self.notify(Notification::Debug(format!("ignoring frame with op {other}"))),
        }
    }

    /// Tear down after a transport close or logout
    ///
    /// Aborts the heartbeat task and, on the first call, emits the
    /// disconnected notification.
    pub fn disconnect(&self) {
        if let Some(handle) = self.heartbeat.lock().take() {
            handle.abort();
        }
        if self.state.mark_disconnected() {
            self.notify(Notification::Disconnected);
        }
    }

    fn handle_dispatch(&self, frame: &GatewayMessage) {
        let Some(tag) = frame.t.as_deref() else {
            self.warn("dispatch frame without event type".to_string());
            return;
        };
        let Some(event) = GatewayEventType::from_str(tag) else {
            self.notify(Notification::Debug(format!("unhandled event type: {tag}")));
            return;
        };

        tracing::trace!(event = %event, sequence = frame.s, "Dispatching event");

        match event {
            GatewayEventType::Ready => self.on_ready(frame),
            GatewayEventType::MessageCreate => self.on_message_create(frame),
            GatewayEventType::MessageUpdate => self.on_message_update(frame),
            GatewayEventType::MessageDelete => self.on_message_delete(frame),
            GatewayEventType::GuildCreate => self.on_server_create(frame),
            GatewayEventType::GuildUpdate => self.on_server_update(frame),
            GatewayEventType::GuildDelete => self.on_server_delete(frame),
            GatewayEventType::ChannelCreate => self.on_channel_create(frame),
            GatewayEventType::ChannelUpdate => self.on_channel_update(frame),
            GatewayEventType::ChannelDelete => self.on_channel_delete(frame),
            GatewayEventType::GuildRoleCreate => self.on_role_create(frame),
            GatewayEventType::GuildRoleUpdate => self.on_role_update(frame),
            GatewayEventType::GuildRoleDelete => self.on_role_delete(frame),
            GatewayEventType::GuildMemberAdd => self.on_member_add(frame),
            GatewayEventType::GuildMemberUpdate => self.on_member_update(frame),
            GatewayEventType::GuildMemberRemove => self.on_member_remove(frame),
            GatewayEventType::GuildBanAdd => self.on_ban_add(frame),
            GatewayEventType::GuildBanRemove => self.on_ban_remove(frame),
            GatewayEventType::PresenceUpdate => self.on_presence_update(frame),
            GatewayEventType::TypingStart => self.on_typing_start(frame),
            GatewayEventType::UserUpdate => self.on_user_update(frame),
        }
    }

    // === Connection ===

    fn on_ready(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<ReadyData>(frame, GatewayEventType::Ready) else {
            return;
        };

        let user = data.user.into_user();
        *self.self_id.lock() = Some(user.id);
        self.mirror.add_user(user);

        for guild in data.guilds {
            let (server, channels, users) = guild.into_parts();
            for user in users {
                self.mirror.add_user(user);
            }
            self.mirror.add_server(server);
            for channel in channels {
                self.mirror.insert_server_channel(channel);
            }
        }

        for direct in data.private_channels {
            let recipient = direct.recipient.into_user();
            let recipient_id = recipient.id;
            self.mirror.add_user(recipient);
            self.mirror
                .add_direct_channel(Channel::new_direct(direct.id, recipient_id));
        }

        self.state.mark_live();

        let old = self
            .heartbeat
            .lock()
            .replace(heartbeat::spawn_heartbeat(data.heartbeat_interval, self.outbound.clone()));
        if let Some(stale) = old {
            stale.abort();
        }

        let stats = self.mirror.stats();
        tracing::info!(
            users = stats.users,
            servers = stats.servers,
            channels = stats.channels,
            direct_channels = stats.direct_channels,
            "Session live"
        );

        self.notify(Notification::Ready);
        self.notify(Notification::Debug(format!(
            "ready: {} users, {} servers, {} channels, {} direct conversations",
            stats.users, stats.servers, stats.channels, stats.direct_channels
        )));
    }

    // === Messages ===

    fn on_message_create(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<MessageData>(frame, GatewayEventType::MessageCreate) else {
            return;
        };

        let (message, author, mentioned) = data.into_parts();
        let channel_id = message.channel_id;

        if !self.mirror.contains_channel(channel_id) {
            self.warn(format!("message {} for uncached channel {channel_id}", message.id));
            return;
        }

        self.mirror.add_user(author);
        for user in mentioned {
            self.mirror.add_user(user);
        }

        match self.mirror.add_message(message) {
            Some(stored) => self.notify(Notification::Message(stored)),
            None => self.warn(format!("message for uncached channel {channel_id}")),
        }
    }

    fn on_message_update(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<MessageUpdateData>(frame, GatewayEventType::MessageUpdate) else {
            return;
        };

        let (id, channel_id) = (data.id, data.channel_id);
        match self.mirror.merge_message(channel_id, id, data.into_patch()) {
            Some((new, old)) => self.notify(Notification::MessageUpdated { new, old }),
            None => self.warn(format!("update for uncached message {id} in channel {channel_id}")),
        }
    }

    fn on_message_delete(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<MessageDeleteData>(frame, GatewayEventType::MessageDelete) else {
            return;
        };

        if !self.mirror.contains_channel(data.channel_id) {
            self.warn(format!("delete for uncached channel {}", data.channel_id));
            return;
        }

        // The message may never have been fetched; the deletion still counts
        let removed = self.mirror.remove_message(data.channel_id, data.id);
        self.notify(Notification::MessageDeleted {
            channel_id: data.channel_id,
            message: removed,
        });
    }

    // === Servers ===

    fn on_server_create(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<GuildData>(frame, GatewayEventType::GuildCreate) else {
            return;
        };

        let (server, channels, users) = data.into_parts();
        for user in users {
            self.mirror.add_user(user);
        }
        let stored = self.mirror.add_server(server);
        for channel in channels {
            self.mirror.insert_server_channel(channel);
        }

        self.notify(Notification::ServerCreated(stored));
    }

    fn on_server_update(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<GuildData>(frame, GatewayEventType::GuildUpdate) else {
            return;
        };

        let Some(old) = self.mirror.get_server(data.id) else {
            self.warn(format!("update for uncached server {}", data.id));
            return;
        };

        // Update payloads never carry collections; the candidate inherits them
        let (incoming, _, _) = data.into_parts();
        let candidate = incoming.carrying_state_from(&old);

        if candidate == old {
            tracing::debug!(server_id = %old.id, "Suppressing no-op server update");
            return;
        }

        self.mirror.update_server(old.id, candidate.clone());
        self.notify(Notification::ServerUpdated { old, new: candidate });
    }

    fn on_server_delete(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<GuildDeleteData>(frame, GatewayEventType::GuildDelete) else {
            return;
        };

        match self.mirror.remove_server_cascade(data.id) {
            Some((server, _channels)) => self.notify(Notification::ServerDeleted(server)),
            None => self.warn(format!("delete for uncached server {}", data.id)),
        }
    }

    // === Channels ===

    fn on_channel_create(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<ChannelData>(frame, GatewayEventType::ChannelCreate) else {
            return;
        };

        if self.mirror.contains_channel(data.id) {
            self.warn(format!("create for already cached channel {}", data.id));
            return;
        }

        if data.is_private {
            let Some(recipient) = data.recipient else {
                self.warn(format!("direct channel {} without recipient", data.id));
                return;
            };
            let user = recipient.into_user();
            let recipient_id = user.id;
            self.mirror.add_user(user);
            let stored = self
                .mirror
                .add_direct_channel(Channel::new_direct(data.id, recipient_id));
            self.notify(Notification::ChannelCreated(stored));
            return;
        }

        let id = data.id;
        let Some(channel) = data.into_server_channel() else {
            self.warn(format!("channel {id} without an owning server"));
            return;
        };
        let server_id = channel.server_id();
        match self.mirror.insert_server_channel(channel) {
            Some(stored) => self.notify(Notification::ChannelCreated(stored)),
            None => self.warn(format!("channel {id} for uncached server {server_id:?}")),
        }
    }

    fn on_channel_update(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<ChannelData>(frame, GatewayEventType::ChannelUpdate) else {
            return;
        };

        let Some(old) = self.mirror.get_channel(data.id) else {
            self.warn(format!("update for uncached channel {}", data.id));
            return;
        };

        let rebuilt = if let Some(recipient_id) = old.recipient_id() {
            Channel::new_direct(data.id, recipient_id)
        } else {
            let Some(channel) = data.into_server_channel() else {
                self.warn(format!("channel update for {} without an owning server", old.id));
                return;
            };
            channel
        };

        let new = rebuilt.with_messages(old.messages.clone());
        self.mirror.update_channel(old.id, new.clone());
        self.notify(Notification::ChannelUpdated { old, new });
    }

    fn on_channel_delete(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<ChannelData>(frame, GatewayEventType::ChannelDelete) else {
            return;
        };

        match self.mirror.remove_channel(data.id) {
            Some(channel) => self.notify(Notification::ChannelDeleted(channel)),
            None => self.warn(format!("delete for uncached channel {}", data.id)),
        }
    }

    // === Roles ===

    fn on_role_create(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<RoleEventData>(frame, GatewayEventType::GuildRoleCreate) else {
            return;
        };

        let role = data.role.into_role(data.guild_id);
        match self
            .mirror
            .with_server_mut(data.guild_id, |server| server.roles.add(role).clone())
        {
            Some(stored) => self.notify(Notification::ServerRoleCreated(stored)),
            None => self.warn(format!("role create for uncached server {}", data.guild_id)),
        }
    }

    fn on_role_update(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<RoleEventData>(frame, GatewayEventType::GuildRoleUpdate) else {
            return;
        };

        let role = data.role.into_role(data.guild_id);
        let role_id = role.id;
        let result = self.mirror.with_server_mut(data.guild_id, |server| {
            let old = server.roles.get(role_id).cloned()?;
            server.roles.update(role_id, role.clone());
            Some(old)
        });

        match result {
            None => self.warn(format!("role update for uncached server {}", data.guild_id)),
            Some(None) => self.warn(format!("update for uncached role {role_id}")),
            Some(Some(old)) => self.notify(Notification::ServerRoleUpdated { old, new: role }),
        }
    }

    fn on_role_delete(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<RoleDeleteData>(frame, GatewayEventType::GuildRoleDelete) else {
            return;
        };

        let result = self
            .mirror
            .with_server_mut(data.guild_id, |server| server.roles.remove(data.role_id));

        match result {
            None => self.warn(format!("role delete for uncached server {}", data.guild_id)),
            Some(None) => self.warn(format!("delete for uncached role {}", data.role_id)),
            Some(Some(role)) => self.notify(Notification::ServerRoleDeleted(role)),
        }
    }

    // === Members ===

    fn on_member_add(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<MemberEventData>(frame, GatewayEventType::GuildMemberAdd) else {
            return;
        };

        let user = self.mirror.add_user(data.user.into_user());
        let mut state = MemberState::new(data.roles.unwrap_or_default(), data.joined_at);
        state.set_voice(data.mute.unwrap_or_default(), data.deaf.unwrap_or_default());

        match self
            .mirror
            .with_server_mut(data.guild_id, |server| server.put_member(user.id, state))
        {
            Some(()) => self.notify(Notification::ServerNewMember {
                server_id: data.guild_id,
                user,
            }),
            None => self.warn(format!("member join for uncached server {}", data.guild_id)),
        }
    }

    fn on_member_update(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<MemberEventData>(frame, GatewayEventType::GuildMemberUpdate) else {
            return;
        };

        let user_id = data.user.id;
        let roles = data.roles;
        let (mute, deaf) = (data.mute, data.deaf);
        let result = self.mirror.with_server_mut(data.guild_id, |server| {
            let Some(state) = server.members.get_mut(&user_id) else {
                return false;
            };
            if let Some(roles) = roles {
                state.set_roles(roles);
            }
            if let Some(mute) = mute {
                state.mute = mute;
            }
            if let Some(deaf) = deaf {
                state.deaf = deaf;
            }
            true
        });

        match result {
            None => self.warn(format!("member update for uncached server {}", data.guild_id)),
            Some(false) => self.warn(format!("update for unknown member {user_id}")),
            Some(true) => {
                let user = self
                    .mirror
                    .get_user(user_id)
                    .unwrap_or_else(|| data.user.into_user());
                self.notify(Notification::ServerMemberUpdated {
                    server_id: data.guild_id,
                    user,
                });
            }
        }
    }

    fn on_member_remove(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<MemberEventData>(frame, GatewayEventType::GuildMemberRemove) else {
            return;
        };

        let user_id = data.user.id;
        let result = self
            .mirror
            .with_server_mut(data.guild_id, |server| server.remove_member(user_id));

        match result {
            None => self.warn(format!("member leave for uncached server {}", data.guild_id)),
            Some(None) => self.warn(format!("leave for unknown member {user_id}")),
            Some(Some(_state)) => {
                let user = self
                    .mirror
                    .get_user(user_id)
                    .unwrap_or_else(|| data.user.into_user());
                self.notify(Notification::ServerMemberRemoved {
                    server_id: data.guild_id,
                    user,
                });
            }
        }
    }

    // === Bans ===

    fn on_ban_add(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<BanData>(frame, GatewayEventType::GuildBanAdd) else {
            return;
        };

        if !self.mirror.contains_server(data.guild_id) {
            self.warn(format!("ban in uncached server {}", data.guild_id));
            return;
        }

        let Some(user) = self.mirror.get_user(data.user.id) else {
            self.warn(format!("ban of uncached user {}", data.user.id));
            return;
        };
        self.notify(Notification::UserBanned {
            user,
            server_id: data.guild_id,
        });
    }

    fn on_ban_remove(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<BanData>(frame, GatewayEventType::GuildBanRemove) else {
            return;
        };

        if !self.mirror.contains_server(data.guild_id) {
            self.warn(format!("unban in uncached server {}", data.guild_id));
            return;
        }

        let Some(user) = self.mirror.get_user(data.user.id) else {
            self.warn(format!("unban of uncached user {}", data.user.id));
            return;
        };
        self.notify(Notification::UserUnbanned {
            user,
            server_id: data.guild_id,
        });
    }

    // === Presence and typing ===

    fn on_presence_update(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<PresenceData>(frame, GatewayEventType::PresenceUpdate) else {
            return;
        };

        let change = self.mirror.apply_presence(
            data.user.id,
            data.user.username,
            data.user.discriminator,
            data.user.avatar,
            data.status,
            data.game_id,
        );

        match change {
            Some(PresenceChange::Status { user, status, game_id }) => {
                self.notify(Notification::Presence { user, status, game_id });
            }
            Some(PresenceChange::Identity { old, new }) => {
                self.notify(Notification::UserUpdated { old, new });
            }
            None => self.warn(format!("presence for uncached user {}", data.user.id)),
        }
    }

    fn on_typing_start(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<TypingData>(frame, GatewayEventType::TypingStart) else {
            return;
        };

        if !self.mirror.contains_channel(data.channel_id) {
            self.warn(format!("typing in uncached channel {}", data.channel_id));
            return;
        }

        let stamp = Utc::now().timestamp_millis();
        if !self.mirror.mark_typing(data.user_id, data.channel_id, stamp) {
            self.warn(format!("typing from uncached user {}", data.user_id));
            return;
        }

        self.notify(Notification::UserTypingStart {
            user_id: data.user_id,
            channel_id: data.channel_id,
        });

        // Quiet-window check; a newer signal supersedes it via the stamp
        let mirror = Arc::clone(&self.mirror);
        let notifier = self.notifier.clone();
        let quiet = self.typing_quiet_ms;
        let user_id = data.user_id;
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(quiet)).await;
            if let Some(channel_id) = mirror.clear_typing_if_quiet(user_id, stamp) {
                let _ = notifier.send(Notification::UserTypingStop { user_id, channel_id });
            }
        });
    }

    fn on_user_update(&self, frame: &GatewayMessage) {
        let Some(data) = self.decode::<UserData>(frame, GatewayEventType::UserUpdate) else {
            return;
        };

        let mut new = data.into_user();
        let Some(old) = self.mirror.get_user(new.id) else {
            self.warn(format!("user update for uncached user {}", new.id));
            return;
        };

        // Presence and typing state carry over; the payload is identity only
        new.set_presence(old.status, old.game_id);
        new.typing = old.typing;

        self.mirror.update_user(new.id, new.clone());
        self.notify(Notification::UserUpdated { old, new });
    }

    // === Helpers ===

    fn decode<T: DeserializeOwned>(&self, frame: &GatewayMessage, event: GatewayEventType) -> Option<T> {
        match frame.data_as::<T>() {
            Ok(data) => Some(data),
            Err(err) => {
                self.warn(format!("undecodable {event} payload: {err}"));
                None
            }
        }
    }

    fn notify(&self, notification: Notification) {
        tracing::trace!(topic = notification.topic(), "Emitting notification");
        let _ = self.notifier.send(notification);
    }

    fn warn(&self, message: String) {
        tracing::warn!(%message, "Event not applied");
        let _ = self.notifier.send(Notification::Warning(message));
    }
}
