use reqwest::header::InvalidHeaderValue;
use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ClusterConfigError {
    #[error("Could not read \"{}\": {}", path.display(), err)]
    Read { path: PathBuf, err: io::Error },
    #[error("Kubeconfig \"{}\" is not valid yaml: {}", path.display(), err)]
    Kubeconfig { path: PathBuf, err: serde_yaml::Error },
    #[error("No kubeconfig, in-cluster service account or default config found")]
    Detect,
    #[error("Current context \"{}\" is not defined", _0)]
    MissingContext(String),
    #[error("Cluster \"{}\" is not defined", _0)]
    MissingCluster(String),
    #[error("User \"{}\" is not defined", _0)]
    MissingUser(String),
    #[error("Invalid base64 in \"{}\": {}", field, err)]
    InvalidBase64 { field: &'static str, err: base64::DecodeError },
    #[error("Invalid client identity: {}", _0)]
    Identity(reqwest::Error),
    #[error("Invalid certificate authority: {}", _0)]
    Certificate(reqwest::Error),
    #[error("Token is not a valid header value: {}", _0)]
    InvalidToken(InvalidHeaderValue),
}
