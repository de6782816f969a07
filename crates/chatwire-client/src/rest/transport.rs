//! REST transport
//!
//! The command layer only sees the trait: a JSON request and a multipart
//! upload. The default implementation speaks HTTP via reqwest against the
//! configured API base; tests substitute a recording mock.

use async_trait::async_trait;
use serde_json::Value;

use chatwire_common::{ClientError, ClientResult};

/// HTTP methods used by the command layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Get the name of this method
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Issues outbound HTTP calls
#[async_trait]
pub trait RestTransport: Send + Sync {
    /// Issue a JSON request; non-success statuses become transport errors
    /// carrying the remote error text
    async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> ClientResult<Value>;

    /// Upload a file as multipart form data
    async fn upload(
        &self,
        path: &str,
        token: Option<&str>,
        filename: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<Value>;
}

/// Default transport over reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base: String,
}

impl HttpTransport {
    /// Create a transport against an API base URL
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.into(),
        }
    }

    fn builder(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base);
        match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Patch => self.client.patch(url),
            Method::Delete => self.client.delete(url),
        }
    }

    async fn finish(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::transport(Some(status.as_u16()), text));
        }

        let text = response
            .text()
            .await
            .map_err(|err| ClientError::transport(Some(status.as_u16()), err))?;
        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|err| ClientError::Protocol(format!("invalid response body: {err}")))
    }
}

#[async_trait]
impl RestTransport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> ClientResult<Value> {
        tracing::debug!(%method, %path, "REST request");

        let mut builder = self.builder(method, path);
        if let Some(token) = token {
            builder = builder.header("Authorization", token);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| ClientError::transport(None, err))?;
        Self::finish(response).await
    }

    async fn upload(
        &self,
        path: &str,
        token: Option<&str>,
        filename: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<Value> {
        tracing::debug!(%path, %filename, size = bytes.len(), "REST upload");

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut builder = self.builder(Method::Post, path).multipart(form);
        if let Some(token) = token {
            builder = builder.header("Authorization", token);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| ClientError::transport(None, err))?;
        Self::finish(response).await
    }
}
