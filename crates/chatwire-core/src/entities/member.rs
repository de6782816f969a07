//! Member state - per-server membership data keyed by user identity

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Membership state stored in a server's member map
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberState {
    pub role_ids: Vec<Snowflake>,
    pub mute: bool,
    pub deaf: bool,
    pub joined_at: Option<DateTime<Utc>>,
}

impl MemberState {
    /// Create a new MemberState
    pub fn new(role_ids: Vec<Snowflake>, joined_at: Option<DateTime<Utc>>) -> Self {
        Self {
            role_ids,
            mute: false,
            deaf: false,
            joined_at,
        }
    }

    /// Check if the member carries a specific role
    #[inline]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.role_ids.contains(&role_id)
    }

    /// Replace the member's roles
    pub fn set_roles(&mut self, role_ids: Vec<Snowflake>) {
        self.role_ids = role_ids;
    }

    /// Set the member's voice flags
    pub fn set_voice(&mut self, mute: bool, deaf: bool) {
        self.mute = mute;
        self.deaf = deaf;
    }
}
