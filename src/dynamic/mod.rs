//! Method tables synthesized from api discovery.
//!
//! Discovery lists every group-version the server serves and, for each resource
//! and verb, installs a [`BoundMethod`] under a name derived from the kind, the
//! sub-resource and the verb (`getDeployment`, `getPodLog`, and `getPods` as an
//! alias of `listPod`). Calls resolve `(namespace?, item?, config?)`, build the
//! route and hand the verb's request to the [`Transport`](crate::k8s_client::Transport).

mod discovery;
mod naming;
mod params;
mod route;
#[cfg(test)]
mod testing;
mod verb;

pub use discovery::{
    group_path, BoundMethod, ClientSpec, DynamicClient, MethodListing, MethodSpec, MethodTable, MethodsFormat,
    CORE_GROUPS,
};
pub use naming::{method_names, PluralException, PluralTable};
pub use params::{resolve_params, CallArg, CallArgs, CallConfig, ResolvedParams};
pub use route::build_route;
pub use verb::{Output, Verb, JSON, STRATEGIC_MERGE_PATCH};
