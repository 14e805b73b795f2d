pub mod api;

use api::{
    cluster_config::{AuthMethod, ClusterConfig},
    K8sApiError,
};
use async_trait::async_trait;
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Method, Request, StatusCode, Url,
};
use serde_json::Value;
use std::{fmt, str::FromStr};

#[derive(Debug, thiserror::Error)]
pub enum K8sClientError {
    #[error("Request error {:?}", _0)]
    Reqwest(#[from] reqwest::Error),
    #[error("Url parse error {:?}", _0)]
    UrlParse(#[from] url::ParseError),
    #[error("Kubernetes api error {}", _0)]
    K8sApi(#[from] K8sApiError),
}

/// A single request as handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path (and query) relative to the server's base url.
    pub relative_url: String,
    pub body: Option<Vec<u8>>,
    pub content_type: Option<&'static str>,
}

impl HttpRequest {
    pub fn new<S: Into<String>>(method: Method, relative_url: S) -> Self {
        Self {
            method,
            relative_url: relative_url.into(),
            body: None,
            content_type: None,
        }
    }

    pub fn with_body(mut self, body: Vec<u8>, content_type: &'static str) -> Self {
        self.body = Some(body);
        self.content_type = Some(content_type);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// The decoded body: JSON when it parses, the text otherwise, `None` when empty.
    pub fn data(&self) -> Option<Value> {
        if self.body.is_empty() {
            return None;
        }
        match serde_json::from_slice(&self.body) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!("response body is not json, returning it as text: {}", err);
                Some(Value::String(String::from_utf8_lossy(&self.body).into_owned()))
            }
        }
    }
}

/// Sends requests to the api server. Any non-success status is an error.
#[async_trait]
pub trait Transport: fmt::Debug + Send + Sync {
    async fn send(&self, req: HttpRequest) -> Result<RawResponse, K8sClientError>;
}

#[derive(Debug, Clone)]
pub struct K8sClient {
    base_url: Url,
    client: reqwest::Client,
}

impl K8sClient {
    pub fn new(config: ClusterConfig) -> Result<Self, K8sClientError> {
        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(cacert) = config.cacert {
            builder = builder.add_root_certificate(cacert);
        }
        // the token is attached once here, every request inherits it
        let mut headers = HeaderMap::new();
        match config.auth {
            AuthMethod::Token(token) => {
                headers.insert(header::AUTHORIZATION, token);
            }
            AuthMethod::Identity(identity) => builder = builder.identity(identity),
            AuthMethod::None => {}
        }
        let client = builder
            .default_headers(headers)
            .build()
            .map_err(K8sClientError::Reqwest)?;

        let mut server = config.server;
        if !server.ends_with('/') {
            server.push('/');
        }
        let base_url = Url::from_str(&server).map_err(K8sClientError::UrlParse)?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Transport for K8sClient {
    async fn send(&self, req: HttpRequest) -> Result<RawResponse, K8sClientError> {
        let url = self.base_url.join(req.relative_url.trim_start_matches('/'))?;
        tracing::debug!(method = %req.method, %url, "sending request");

        let mut request = Request::new(req.method, url);
        if let Some(content_type) = req.content_type {
            request
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        if let Some(body) = req.body {
            *request.body_mut() = Some(reqwest::Body::from(body));
        }

        let resp = self.client.execute(request).await?;
        let status = resp.status();
        let body = resp.bytes().await?.to_vec();
        if !status.is_success() {
            tracing::debug!(%status, "request failed");
            return Err(K8sApiError::UnexpectedStatus {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            }
            .into());
        }
        Ok(RawResponse { status, body })
    }
}
