use crate::k8s_client::{api::cluster_config::ClusterConfigError, K8sClientError};
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Discovery of \"{}\" failed: {}", path, source)]
    Discovery { path: String, source: K8sClientError },
    #[error("This method should contain at least a namespace")]
    MissingNamespace,
    #[error("Unsupported method: {:?}", _0)]
    UnsupportedVerb(String),
    #[error("No method {:?} in {:?}", method, group_version)]
    UnknownMethod { group_version: String, method: String },
    #[error("Kubernetes client error: {}", _0)]
    Transport(#[from] K8sClientError),
    #[error("Could not obtain cluster config: {}", _0)]
    ClusterConfig(#[from] ClusterConfigError),
    #[error("Serialization error: {:?}", _0)]
    Json(#[from] serde_json::Error),
    #[error("Invalid argument: {}", _0)]
    InvalidArgument(String),
    #[error("Could not read token: {:?}", _0)]
    Io(#[from] io::Error),
}
