//! Typing state
//!
//! A typing signal stamps the user with a monotonic millisecond value. The
//! delayed quiet-window check re-reads the live stamp and only fires when it
//! is unchanged, so a newer signal supersedes an older pending check without
//! cancellable timers.

use chatwire_core::Snowflake;

use super::StateMirror;

impl StateMirror {
    /// Record a typing signal; returns `false` when the user is not cached
    pub fn mark_typing(&self, user_id: Snowflake, channel_id: Snowflake, now_ms: i64) -> bool {
        self.with_user_mut(user_id, |user| {
            user.typing.since_ms = Some(now_ms);
            user.typing.channel_id = Some(channel_id);
        })
        .is_some()
    }

    /// The stamp of the most recent typing signal, if any
    pub fn typing_since(&self, user_id: Snowflake) -> Option<i64> {
        self.get_user(user_id).and_then(|u| u.typing.since_ms)
    }

    /// Clear typing state if no newer signal arrived since `observed_ms`
    ///
    /// Returns the channel the user was typing in when cleared, `None` when a
    /// newer signal superseded the check or the user is gone.
    pub fn clear_typing_if_quiet(&self, user_id: Snowflake, observed_ms: i64) -> Option<Snowflake> {
        self.with_user_mut(user_id, |user| {
            if user.typing.since_ms == Some(observed_ms) {
                let channel_id = user.typing.channel_id;
                user.typing.clear();
                channel_id
            } else {
                None
            }
        })
        .flatten()
    }
}
