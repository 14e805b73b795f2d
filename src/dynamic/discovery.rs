use super::{
    naming::{method_names, PluralTable},
    params::{resolve_params, CallArg, CallArgs, ResolvedParams},
    route::build_route,
    verb::{Output, Verb, JSON},
};
use crate::{
    error::Error,
    k8s_client::{
        api::{cluster_config::ClusterConfig, fetch, ApiGroupListGetter, ApiResourceList, ApiResourceListGetter},
        HttpRequest, K8sClient, Transport,
    },
};
use futures_util::future::try_join_all;
use reqwest::Method;
use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::Value;
use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

/// Groups that `GET /apis` never lists but that are always served.
pub const CORE_GROUPS: [(&str, &str); 2] = [("api", "v1"), ("oapi", "v1")];

/// Request prefix of a group-version; doubles as its key in the method table.
pub fn group_path(group: &str, version: &str) -> String {
    if CORE_GROUPS.iter().any(|(core, _)| *core == group) {
        format!("{}/{}", group, version)
    } else {
        format!("apis/{}/{}", group, version)
    }
}

/// A synthesized method: one verb on one resource of one group-version.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundMethod {
    group_path: String,
    kind: String,
    collection: String,
    namespaced: bool,
    verb: Verb,
}

impl BoundMethod {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn namespaced(&self) -> bool {
        self.namespaced
    }

    pub fn verb(&self) -> &Verb {
        &self.verb
    }

    /// Builds the request for already resolved parameters.
    pub fn request(&self, params: &ResolvedParams) -> Result<HttpRequest, Error> {
        let route = build_route(
            &self.group_path,
            params.namespace.as_deref(),
            self.namespaced,
            &self.collection,
            params.resource_item.as_deref(),
            params.config.query.as_ref(),
        );
        self.verb.dispatch(route, params.config.body.as_ref())
    }

    pub async fn send(&self, transport: &dyn Transport, params: &ResolvedParams) -> Result<Output, Error> {
        let req = self.request(params)?;
        let resp = transport.send(req).await?;
        Ok(resp.into())
    }

    /// Resolves positional arguments, then sends the request.
    pub async fn invoke(&self, transport: &dyn Transport, args: &[CallArg]) -> Result<Output, Error> {
        let params = resolve_params(self.namespaced, args)?;
        self.send(transport, &params).await
    }
}

/// group-version key -> method name -> method. Fixed once discovery is done.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MethodTable {
    groups: HashMap<String, HashMap<String, BoundMethod>>,
}

impl MethodTable {
    pub fn get(&self, group_version: &str, method: &str) -> Option<&BoundMethod> {
        self.groups.get(group_version)?.get(method)
    }

    pub fn group(&self, group_version: &str) -> Option<&HashMap<String, BoundMethod>> {
        self.groups.get(group_version)
    }

    pub fn group_versions(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSpec {
    pub method_name: String,
    pub resource_kind: String,
    pub namespaced: bool,
}

/// Listing of every synthesized method, in discovery order. Serializes as a
/// map from group-version to its methods.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientSpec {
    groups: Vec<(String, Vec<MethodSpec>)>,
}

impl ClientSpec {
    fn push(&mut self, group_version: &str, spec: MethodSpec) {
        match self.groups.iter_mut().find(|(gv, _)| gv == group_version) {
            Some((_, methods)) => methods.push(spec),
            None => self.groups.push((group_version.to_string(), vec![spec])),
        }
    }

    pub fn methods(&self, group_version: &str) -> Option<&[MethodSpec]> {
        self.groups
            .iter()
            .find(|(gv, _)| gv == group_version)
            .map(|(_, methods)| methods.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MethodSpec])> {
        self.groups.iter().map(|(gv, methods)| (gv.as_str(), methods.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn to_markdown(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ClientSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (group_version, methods) in self.iter() {
            writeln!(f, "### {}\n", group_version)?;
            for spec in methods {
                let param = if spec.namespaced { "namespace" } else { "" };
                writeln!(f, "- {}({})", spec.method_name, param)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Serialize for ClientSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (group_version, methods) in &self.groups {
            map.serialize_entry(group_version, methods)?;
        }
        map.end()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodsFormat {
    Markdown,
}

impl FromStr for MethodsFormat {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" => Ok(MethodsFormat::Markdown),
            other => Err(Error::InvalidArgument(format!("unknown methods format {:?}", other))),
        }
    }
}

#[derive(Debug)]
pub enum MethodListing<'a> {
    Markdown(String),
    Spec(&'a ClientSpec),
}

/// Folds fetched resource lists into the method table and its listing.
fn build_tables(resource_lists: Vec<(String, ApiResourceList)>, plurals: &PluralTable) -> (MethodTable, ClientSpec) {
    let mut table = MethodTable::default();
    let mut spec = ClientSpec::default();

    for (group_path, list) in resource_lists {
        for resource in list.resources {
            for token in &resource.verbs {
                let method = BoundMethod {
                    group_path: group_path.clone(),
                    kind: resource.kind.clone(),
                    collection: resource.name.clone(),
                    namespaced: resource.namespaced,
                    verb: Verb::from(token.as_str()),
                };
                for name in method_names(token, &resource.kind, &resource.name, plurals) {
                    // later resources may redefine a name; the last one wins
                    table
                        .groups
                        .entry(group_path.clone())
                        .or_default()
                        .insert(name.clone(), method.clone());
                    spec.push(
                        &group_path,
                        MethodSpec {
                            method_name: name,
                            resource_kind: resource.kind.clone(),
                            namespaced: resource.namespaced,
                        },
                    );
                }
            }
        }
    }
    (table, spec)
}

/// A client whose methods were synthesized from the server's discovery endpoints.
#[derive(Clone, Debug)]
pub struct DynamicClient {
    transport: Arc<dyn Transport>,
    methods: MethodTable,
    spec: ClientSpec,
}

impl DynamicClient {
    /// Connects with `config` and runs discovery using the bundled plural table.
    pub async fn build(config: ClusterConfig) -> Result<Self, Error> {
        let transport = K8sClient::new(config)?;
        let plurals = PluralTable::bundled()?;
        Self::discover(Arc::new(transport), plurals).await
    }

    /// Runs discovery over `transport`. Any failed fetch fails the whole build.
    pub async fn discover(transport: Arc<dyn Transport>, plurals: PluralTable) -> Result<Self, Error> {
        let group_list = fetch(transport.as_ref(), &ApiGroupListGetter)
            .await
            .map_err(|source| Error::Discovery {
                path: "apis".into(),
                source,
            })?;

        let mut group_paths: Vec<String> = group_list
            .groups
            .into_iter()
            .map(|group| group_path(&group.name, &group.preferred_version.version))
            .collect();
        group_paths.extend(CORE_GROUPS.iter().map(|(group, version)| group_path(group, version)));

        let t = transport.as_ref();
        let resource_lists = try_join_all(group_paths.into_iter().map(|path| async move {
            tracing::debug!(%path, "fetching resource list");
            let result = fetch(t, &ApiResourceListGetter { path: &path }).await;
            match result {
                Ok(list) => Ok((path, list)),
                Err(source) => Err(Error::Discovery { path, source }),
            }
        }))
        .await?;

        let (methods, spec) = build_tables(resource_lists, &plurals);
        tracing::info!(
            group_versions = spec.len(),
            methods = methods.len(),
            "built method table"
        );
        Ok(Self {
            transport,
            methods,
            spec,
        })
    }

    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    pub fn client_spec(&self) -> &ClientSpec {
        &self.spec
    }

    pub fn method(&self, group_version: &str, method: &str) -> Result<&BoundMethod, Error> {
        self.methods
            .get(group_version, method)
            .ok_or_else(|| Error::UnknownMethod {
                group_version: group_version.to_string(),
                method: method.to_string(),
            })
    }

    /// Calls a method with positional `(namespace?, item?, config?)` arguments.
    pub async fn invoke(&self, group_version: &str, method: &str, args: &[CallArg]) -> Result<Output, Error> {
        self.method(group_version, method)?
            .invoke(self.transport.as_ref(), args)
            .await
    }

    /// Calls a method with named arguments.
    pub async fn call(&self, group_version: &str, method: &str, args: CallArgs) -> Result<Output, Error> {
        let method = self.method(group_version, method)?;
        let params = args.resolve(method.namespaced())?;
        method.send(self.transport.as_ref(), &params).await
    }

    pub fn get_methods(&self, format: Option<MethodsFormat>) -> MethodListing<'_> {
        match format {
            Some(MethodsFormat::Markdown) => MethodListing::Markdown(self.spec.to_markdown()),
            None => MethodListing::Spec(&self.spec),
        }
    }

    /// Sends `verb` to an arbitrary path, bypassing the method table.
    /// GET and DELETE never carry `body`.
    pub async fn custom_call(&self, verb: &str, path: &str, body: Option<&Value>) -> Result<Output, Error> {
        let method = Method::from_bytes(verb.to_ascii_uppercase().as_bytes())
            .map_err(|_| Error::InvalidArgument(format!("invalid http verb {:?}", verb)))?;
        let carries_body = method != Method::GET && method != Method::DELETE;
        let mut req = HttpRequest::new(method, path);
        if let Some(body) = body.filter(|_| carries_body) {
            req = req.with_body(serde_json::to_vec(body)?, JSON);
        }
        let resp = self.transport.send(req).await?;
        Ok(resp.into())
    }
}
