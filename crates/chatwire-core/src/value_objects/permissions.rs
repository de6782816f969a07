//! Permissions bitflags for role metadata
//!
//! The gateway delivers role permissions as a 64-bit integer bitfield; the
//! mirror stores them untouched and exposes typed queries.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Permission flags carried on roles
    ///
    /// Serialized as a decimal string in JSON for JavaScript safety.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u64 {
        /// View channel and read messages
        const VIEW_CHANNEL     = 1 << 0;
        /// Send messages in text channels
        const SEND_MESSAGES    = 1 << 1;
        /// Delete other users' messages
        const MANAGE_MESSAGES  = 1 << 2;
        /// Create, edit, delete channels
        const MANAGE_CHANNELS  = 1 << 3;
        /// Create, edit, delete, assign roles
        const MANAGE_ROLES     = 1 << 4;
        /// Edit server settings
        const MANAGE_SERVER    = 1 << 5;
        /// Kick members from the server
        const KICK_MEMBERS     = 1 << 6;
        /// Ban members from the server
        const BAN_MEMBERS      = 1 << 7;
        /// Bypass all permission checks
        const ADMINISTRATOR    = 1 << 8;
        /// Upload files and images
        const ATTACH_FILES     = 1 << 9;

        /// Default permissions for the @everyone role
        const DEFAULT = Self::VIEW_CHANNEL.bits()
            | Self::SEND_MESSAGES.bits()
            | Self::ATTACH_FILES.bits();
    }
}

impl Permissions {
    /// Check if the permission set contains a required permission
    ///
    /// Administrators bypass all permission checks.
    #[inline]
    pub fn has(&self, permission: Permissions) -> bool {
        if self.contains(Permissions::ADMINISTRATOR) {
            return true;
        }
        self.contains(permission)
    }

    /// Combine permissions from multiple roles
    pub fn combine<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Permissions>,
    {
        roles.into_iter().fold(Permissions::empty(), |acc, p| acc | p)
    }

    /// Parse from string representation (decimal number)
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        s.parse::<u64>().map(Permissions::from_bits_truncate)
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

// Serialize as decimal string
impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.bits().to_string())
    }
}

// Deserialize from string or number
impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct PermissionsVisitor;

        impl<'de> Visitor<'de> for PermissionsVisitor {
            type Value = Permissions;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer permission bitfield")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                Ok(Permissions::from_bits_truncate(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                Ok(Permissions::from_bits_truncate(value as u64))
            }

            fn visit_str<E>(self, value: &str) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                Permissions::parse(value).map_err(|_| de::Error::custom("invalid permission string"))
            }
        }

        deserializer.deserialize_any(PermissionsVisitor)
    }
}
