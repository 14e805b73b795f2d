use crate::k8s_client::{api::K8sApiError, HttpRequest, K8sClientError, RawResponse, Transport};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::{collections::HashMap, sync::Mutex};

/// In-memory transport: canned responses by path, everything else echoes its url.
#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: HashMap<String, Result<Value, StatusCode>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), Ok(body));
        self
    }

    pub fn fail(mut self, path: &str, status: StatusCode) -> Self {
        self.responses.insert(path.to_string(), Err(status));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.requests.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, req: HttpRequest) -> Result<RawResponse, K8sClientError> {
        let path = req.relative_url.clone();
        self.requests.lock().unwrap().push(req);
        match self.responses.get(&path) {
            Some(Ok(body)) => Ok(RawResponse {
                status: StatusCode::OK,
                body: serde_json::to_vec(body).map_err(K8sApiError::from)?,
            }),
            Some(Err(status)) => Err(K8sApiError::UnexpectedStatus {
                status: *status,
                body: String::new(),
            }
            .into()),
            None => Ok(RawResponse {
                status: StatusCode::OK,
                body: serde_json::to_vec(&json!({ "echo": path })).map_err(K8sApiError::from)?,
            }),
        }
    }
}
