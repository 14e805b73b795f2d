use serde::{Deserialize, Serialize};

/// One entry of a discovery resource list. `name` is the collection path
/// segment and may carry a sub-resource, e.g. `pods/log`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResource {
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub namespaced: bool,
    #[serde(default)]
    pub verbs: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResourceList {
    #[serde(rename = "groupVersion", default)]
    pub group_version: String,
    pub resources: Vec<ApiResource>,
}
