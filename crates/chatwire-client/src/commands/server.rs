//! Server commands

use serde_json::json;

use chatwire_common::{ClientError, ClientResult};
use chatwire_core::Server;
use chatwire_gateway::events::GuildData;

use crate::resolver::{resolve_server, ServerRef};
use crate::rest::{Endpoints, Method};
use crate::session::Session;

impl Session {
    /// Create a server and fold the response into the mirror
    ///
    /// The returned value is the cached one, so the caller sees the same
    /// state a serverCreated listener would.
    pub async fn create_server(&self, name: &str, region: &str) -> ClientResult<Server> {
        let token = self.auth()?;

        let body = json!({"name": name, "region": region});
        let response = self
            .rest
            .request(Method::Post, Endpoints::servers(), Some(&token), Some(body))
            .await?;

        let data: GuildData = serde_json::from_value(response)
            .map_err(|err| ClientError::Protocol(format!("invalid server payload: {err}")))?;

        let (server, channels, users) = data.into_parts();
        for user in users {
            self.mirror.add_user(user);
        }
        let stored = self.mirror.add_server(server);
        for channel in channels {
            self.mirror.insert_server_channel(channel);
        }

        tracing::info!(server_id = %stored.id, name = %stored.name, "Created server");
        Ok(stored)
    }

    /// Leave a server and drop it and its channels from the mirror
    pub async fn leave_server(&self, target: impl Into<ServerRef> + Send) -> ClientResult<()> {
        let token = self.auth()?;
        let server = resolve_server(&self.mirror, target.into())?;

        self.rest
            .request(Method::Delete, &Endpoints::server(server.id), Some(&token), None)
            .await?;

        self.mirror.remove_server_cascade(server.id);
        tracing::info!(server_id = %server.id, "Left server");
        Ok(())
    }
}
