use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiGroupVersion {
    #[serde(rename = "groupVersion")]
    pub group_version: String,
    pub version: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiGroupListItem {
    pub name: String,
    #[serde(default)]
    pub versions: Vec<ApiGroupVersion>,
    /// Required: a group without one makes the whole list undecodable.
    #[serde(rename = "preferredVersion")]
    pub preferred_version: ApiGroupVersion,
}

/// Response of `GET /apis`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiGroupList {
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    pub groups: Vec<ApiGroupListItem>,
}
