//! A Kubernetes/OpenShift client whose methods are synthesized at startup
//! from the server's discovery endpoints.
//!
//! ```no_run
//! use kube_methods::{CallArg, ClusterConfig, DynamicClient};
//!
//! # async fn run() -> Result<(), kube_methods::Error> {
//! let config = ClusterConfig::new("https://localhost:6443", Some("token"))?;
//! let client = DynamicClient::build(config).await?;
//! let deployment = client
//!     .invoke("apis/apps/v1", "getDeployment", &[CallArg::from("default"), CallArg::from("web")])
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod dynamic;
pub mod error;
pub mod k8s_client;
pub mod utils;

pub use dynamic::{
    BoundMethod, CallArg, CallArgs, CallConfig, ClientSpec, DynamicClient, MethodListing, MethodTable,
    MethodsFormat, Output, PluralTable,
};
pub use error::Error;
pub use k8s_client::{
    api::cluster_config::{AuthMethod, ClusterConfig},
    HttpRequest, K8sClient, RawResponse, Transport,
};
