mod api_group;
mod api_resource;
pub mod cluster_config;

use super::{HttpRequest, K8sClientError, Transport};
pub use api_group::{ApiGroupList, ApiGroupListItem, ApiGroupVersion};
pub use api_resource::{ApiResource, ApiResourceList};
use reqwest::{Method, StatusCode};
use std::fmt;

pub trait ApiGetter {
    type Output;
    fn get(&self) -> Req<Self::Output>;
}

#[derive(Debug, thiserror::Error)]
pub enum K8sApiError {
    #[error("Unexpected status [{}]: {}", status, body)]
    UnexpectedStatus { status: StatusCode, body: String },
    #[error("Deserialization error: {:?}", _0)]
    Deserialize(#[from] serde_json::Error),
}

pub struct Req<T> {
    pub request: HttpRequest,
    pub status_check: fn(StatusCode) -> bool,
    pub response: fn(&[u8]) -> Result<T, K8sApiError>,
}

impl<T> fmt::Debug for Req<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Req")
            .field("method", &self.request.method)
            .field("relative_url", &self.request.relative_url)
            .field("response", &"fn(...)")
            .finish()
    }
}

impl<T> Req<T> {
    fn get<S: Into<String>>(relative_url: S, f: fn(&[u8]) -> Result<T, K8sApiError>) -> Self {
        Self {
            request: HttpRequest::new(Method::GET, relative_url),
            status_check: |status_code| status_code == StatusCode::OK,
            response: f,
        }
    }
}

/// Runs a getter against `transport` and decodes its response.
pub async fn fetch<T: ApiGetter>(transport: &dyn Transport, getter: &T) -> Result<T::Output, K8sClientError> {
    let req = getter.get();
    let resp = transport.send(req.request).await?;
    if !(req.status_check)(resp.status) {
        return Err(K8sApiError::UnexpectedStatus {
            status: resp.status,
            body: String::from_utf8_lossy(&resp.body).into_owned(),
        }
        .into());
    }
    let result = (req.response)(&resp.body)?;
    Ok(result)
}

#[derive(Debug, Clone)]
pub struct ApiGroupListGetter;
impl ApiGetter for ApiGroupListGetter {
    type Output = ApiGroupList;
    fn get(&self) -> Req<Self::Output> {
        Req::get("apis", |resp| Ok(serde_json::from_slice(resp)?))
    }
}

/// Resource list of one group-version, addressed by its request prefix
/// (`apis/<group>/<version>`, or `<group>/<version>` for the core groups).
#[derive(Debug, Clone)]
pub struct ApiResourceListGetter<'a> {
    pub path: &'a str,
}
impl<'a> ApiGetter for ApiResourceListGetter<'a> {
    type Output = ApiResourceList;
    fn get(&self) -> Req<Self::Output> {
        Req::get(self.path, |resp| Ok(serde_json::from_slice(resp)?))
    }
}
