use super::error::ClusterConfigError;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// The subset of a kubeconfig file needed to reach the current context's cluster.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct Kubeconfig {
    #[serde(default)]
    pub clusters: Vec<Named<Cluster>>,
    #[serde(default)]
    pub users: Vec<Named<User>>,
    #[serde(default)]
    pub contexts: Vec<Named<Context>>,
    #[serde(rename = "current-context", default)]
    pub current_context: String,
}

/// A kubeconfig list entry: `{name, <cluster|user|context>: ...}`.
#[derive(Clone, Debug, Deserialize)]
pub struct Named<T> {
    pub name: String,
    #[serde(alias = "cluster", alias = "user", alias = "context")]
    pub value: T,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Cluster {
    pub server: String,
    #[serde(rename = "certificate-authority-data")]
    pub certificate_authority_data: Option<String>,
}

/// Either a bearer token or a client certificate pair; a token wins when both are set.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct User {
    pub token: Option<String>,
    #[serde(rename = "client-certificate-data")]
    pub client_certificate_data: Option<String>,
    #[serde(rename = "client-key-data")]
    pub client_key_data: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Context {
    pub cluster: String,
    pub user: String,
}

fn find<T>(entries: Vec<Named<T>>, name: &str) -> Option<T> {
    entries.into_iter().find(|e| e.name == name).map(|e| e.value)
}

impl Kubeconfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Kubeconfig, ClusterConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|err| ClusterConfigError::Read { path: path.into(), err })?;
        serde_yaml::from_str(&yaml).map_err(|err| ClusterConfigError::Kubeconfig { path: path.into(), err })
    }

    /// `~/.kube/config`, if it exists.
    pub fn from_default_path() -> Option<Result<Kubeconfig, ClusterConfigError>> {
        let path: PathBuf = dirs::home_dir()?.join(".kube").join("config");
        if !path.exists() {
            return None;
        }
        Some(Self::from_path(path))
    }

    pub fn from_env() -> Option<Result<Self, ClusterConfigError>> {
        std::env::var_os("KUBECONFIG").map(Self::from_path)
    }

    /// Cluster and user of the current context.
    pub fn current(self) -> Result<(Cluster, User), ClusterConfigError> {
        let context = find(self.contexts, &self.current_context)
            .ok_or_else(|| ClusterConfigError::MissingContext(self.current_context.clone()))?;
        let cluster = find(self.clusters, &context.cluster).ok_or(ClusterConfigError::MissingCluster(context.cluster))?;
        let user = find(self.users, &context.user).ok_or(ClusterConfigError::MissingUser(context.user))?;
        Ok((cluster, user))
    }
}
