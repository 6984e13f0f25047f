use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
}

/// Status and raw body of a completed request.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_slice(&self.body).map_err(|err| TransportError::Decode(err.to_string()))
    }
}

/// Issues requests against the dashboard API with credentials attached.
///
/// A non-2xx status is not an error at this layer; callers decide what a
/// failed status means. Errors are reserved for requests that produced no
/// response at all.
#[async_trait]
pub trait AuthenticatedTransport: Send + Sync {
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, TransportError>;

    async fn get(&self, path: &str) -> Result<ApiResponse, TransportError> {
        self.send(HttpMethod::Get, path, None).await
    }

    async fn put_json(&self, path: &str, body: Value) -> Result<ApiResponse, TransportError> {
        self.send(HttpMethod::Put, path, Some(body)).await
    }
}

/// Attaches credentials to an outgoing request.
pub trait RequestSigner: Send + Sync {
    fn sign(&self, request: RequestBuilder) -> RequestBuilder;
}

pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl RequestSigner for BearerToken {
    fn sign(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.0)
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    signer: Option<Arc<dyn RequestSigner>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base = sanitize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base,
            client,
            signer: None,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = Self::new(config.api_url.clone(), config.request_timeout())?;
        Ok(match config.api_token.as_deref() {
            Some(token) if !token.is_empty() => client.with_signer(BearerToken::new(token)),
            _ => client,
        })
    }

    pub fn with_signer(mut self, signer: impl RequestSigner + 'static) -> Self {
        self.signer = Some(Arc::new(signer));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<()> {
        self.base_url = sanitize_base_url(base_url.into())?;
        Ok(())
    }

    fn url(&self, path: &str) -> Result<Url, TransportError> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|err| TransportError::InvalidUrl(format!("{joined}: {err}")))
    }
}

#[async_trait]
impl AuthenticatedTransport for ApiClient {
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, TransportError> {
        let url = self.url(path)?;
        let mut request = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Put => self.client.put(url),
        };
        if let Some(body) = body {
            request = request.json(&body);
        }
        if let Some(signer) = &self.signer {
            request = signer.sign(request);
        }

        let response = request
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

pub(crate) fn sanitize_base_url(mut base: String) -> Result<String> {
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    let _ = Url::parse(&base).context("invalid base URL")?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_scheme_and_loses_trailing_slash() {
        let base = sanitize_base_url("localhost:8000/api//".into()).expect("sanitize");
        assert_eq!(base, "http://localhost:8000/api");
    }

    #[test]
    fn url_keeps_base_path_and_query() {
        let client = ApiClient::new("https://dash.example.com/api/", Duration::from_secs(5))
            .expect("client");
        let url = client.url("/calls?limit=25&starred=0").expect("url");
        assert_eq!(url.as_str(), "https://dash.example.com/api/calls?limit=25&starred=0");
    }

    #[test]
    fn success_range() {
        assert!(ApiResponse::new(204, Vec::new()).is_success());
        assert!(!ApiResponse::new(302, Vec::new()).is_success());
        assert!(!ApiResponse::new(500, Vec::new()).is_success());
    }
}
