//! Presence application
//!
//! A presence event either changes only status/game (mutate in place) or
//! touches identity-affecting fields (replace the cached user). The two
//! outcomes are mutually exclusive and map to distinct notifications.

use chatwire_core::{PresenceStatus, Snowflake, User};

use super::StateMirror;

/// Outcome of applying a presence event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceChange {
    /// Only status/game changed; carries the already-updated user
    Status {
        user: User,
        status: PresenceStatus,
        game_id: Option<u64>,
    },
    /// Name/avatar/discriminator changed; the cached value was replaced
    Identity { old: User, new: User },
}

impl StateMirror {
    /// Apply a presence event against a cached user
    ///
    /// Identity fields absent from the payload inherit the cached value, so a
    /// bare status change never looks like a rename. Returns `None` when the
    /// user is not cached.
    pub fn apply_presence(
        &self,
        user_id: Snowflake,
        username: Option<String>,
        discriminator: Option<String>,
        avatar: Option<String>,
        status: PresenceStatus,
        game_id: Option<u64>,
    ) -> Option<PresenceChange> {
        let old = self.get_user(user_id)?;

        let mut candidate = old.clone();
        if let Some(username) = username {
            candidate.username = username;
        }
        if let Some(discriminator) = discriminator {
            candidate.discriminator = discriminator;
        }
        if let Some(avatar) = avatar {
            candidate.avatar = Some(avatar);
        }

        if candidate.same_identity(&old) {
            // a real presence update
            let updated = self.with_user_mut(user_id, |user| {
                user.set_presence(status, game_id);
                user.clone()
            })?;
            Some(PresenceChange::Status {
                user: updated,
                status,
                game_id,
            })
        } else {
            // a name or avatar change; presence carries over
            candidate.set_presence(status, game_id);
            self.update_user(user_id, candidate.clone());
            Some(PresenceChange::Identity {
                old,
                new: candidate,
            })
        }
    }
}
