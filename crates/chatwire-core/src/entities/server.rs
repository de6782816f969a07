//! Server entity - a chat server owning channels, roles, and members

use std::collections::HashMap;

use crate::collections::{Keyed, Store};
use crate::entities::{MemberState, Role};
use crate::value_objects::Snowflake;

/// Server entity
///
/// The member map is keyed by user identity; every entry is expected to have
/// a corresponding cached User (best-effort, may be stale if eviction races).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    pub id: Snowflake,
    pub name: String,
    pub region: String,
    pub icon: Option<String>,
    pub owner_id: Option<Snowflake>,
    /// Ordered list of owned channel identities
    pub channel_ids: Vec<Snowflake>,
    pub roles: Store<Role>,
    pub members: HashMap<Snowflake, MemberState>,
}

impl Server {
    /// Create a new Server
    pub fn new(id: Snowflake, name: String, region: String) -> Self {
        Self {
            id,
            name,
            region,
            icon: None,
            owner_id: None,
            channel_ids: Vec::new(),
            roles: Store::new(),
            members: HashMap::new(),
        }
    }

    /// Check if a user is the server owner
    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == Some(user_id)
    }

    /// Append a channel to the ordered channel list if absent
    pub fn add_channel(&mut self, channel_id: Snowflake) {
        if !self.channel_ids.contains(&channel_id) {
            self.channel_ids.push(channel_id);
        }
    }

    /// Detach a channel from the channel list; no-op if absent
    pub fn remove_channel(&mut self, channel_id: Snowflake) {
        self.channel_ids.retain(|&id| id != channel_id);
    }

    /// Check whether a channel belongs to this server
    #[inline]
    pub fn has_channel(&self, channel_id: Snowflake) -> bool {
        self.channel_ids.contains(&channel_id)
    }

    /// Look up a member's state
    #[inline]
    pub fn member(&self, user_id: Snowflake) -> Option<&MemberState> {
        self.members.get(&user_id)
    }

    /// Insert or replace a member's state
    pub fn put_member(&mut self, user_id: Snowflake, state: MemberState) {
        self.members.insert(user_id, state);
    }

    /// Remove a member; no-op if absent
    pub fn remove_member(&mut self, user_id: Snowflake) -> Option<MemberState> {
        self.members.remove(&user_id)
    }

    /// Number of members
    #[inline]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Build an update candidate carrying forward aggregate state
    ///
    /// Update payloads never carry members, roles, or the channel list, so a
    /// replacement value inherits them untouched from the cached server.
    #[must_use]
    pub fn carrying_state_from(mut self, prior: &Server) -> Server {
        self.channel_ids = prior.channel_ids.clone();
        self.roles = prior.roles.clone();
        self.members = prior.members.clone();
        self
    }
}

impl Keyed for Server {
    fn key(&self) -> Snowflake {
        self.id
    }
}
