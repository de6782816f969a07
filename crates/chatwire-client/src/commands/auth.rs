//! Login and logout

use serde_json::{json, Value};

use chatwire_common::{ClientError, ClientResult};
use chatwire_gateway::connection::ConnectionState;

use crate::rest::{Endpoints, Method};
use crate::session::Session;

impl Session {
    /// Authenticate and bring the push connection up
    ///
    /// Fails with state misuse while a login is in flight or complete. On any
    /// failure the session re-enters an idle-equivalent state, so the caller
    /// may retry.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<String> {
        self.state.begin_login()?;

        let result = self.do_login(email, password).await;
        if result.is_err() {
            self.teardown();
        }
        result
    }

    async fn do_login(&self, email: &str, password: &str) -> ClientResult<String> {
        let body = json!({"email": email, "password": password});
        let response = self
            .rest
            .request(Method::Post, Endpoints::login(), None, Some(body))
            .await?;

        let token = response
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::Protocol("login response missing token".to_string()))?
            .to_string();

        tracing::info!("Authenticated");
        *self.token.write() = Some(token.clone());
        self.state.set(ConnectionState::Authenticated);

        self.connect_push(&token).await?;
        Ok(token)
    }

    /// Invalidate the session remotely and tear down locally
    ///
    /// Local teardown happens even when the remote call fails; credentials
    /// are cleared and in-flight commands fail as not authenticated.
    pub async fn logout(&self) -> ClientResult<()> {
        let token = self.auth()?;

        let result = self
            .rest
            .request(Method::Post, Endpoints::logout(), Some(&token), None)
            .await;

        self.teardown();
        result.map(|_| ())
    }
}
