//! Role entity - permission metadata owned by a server

use crate::collections::Keyed;
use crate::value_objects::{Permissions, Snowflake};

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub server_id: Snowflake,
    pub name: String,
    pub permissions: Permissions,
    pub color: u32,
    pub hoist: bool,
    pub position: i32,
}

impl Role {
    /// Create a new Role with default permissions
    pub fn new(id: Snowflake, server_id: Snowflake, name: String) -> Self {
        Self {
            id,
            server_id,
            name,
            permissions: Permissions::default(),
            color: 0,
            hoist: false,
            position: 0,
        }
    }

    /// Check if this role grants a permission
    #[inline]
    pub fn has_permission(&self, permission: Permissions) -> bool {
        self.permissions.has(permission)
    }
}

impl Keyed for Role {
    fn key(&self) -> Snowflake {
        self.id
    }
}
