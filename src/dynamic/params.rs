use crate::error::Error;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Query parameters and payload of a call. Unknown keys of the source object are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallConfig {
    pub query: Option<Map<String, Value>>,
    pub body: Option<Value>,
}

impl CallConfig {
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let query = match object.remove("query") {
            Some(Value::Object(query)) => Some(query),
            _ => None,
        };
        let body = match object.remove("body") {
            Some(Value::Null) | None => None,
            Some(body) => Some(body),
        };
        Self { query, body }
    }
}

/// One positional argument of a synthesized method.
#[derive(Clone, Debug, PartialEq)]
pub enum CallArg {
    Str(String),
    Config(CallConfig),
}

impl From<&str> for CallArg {
    fn from(s: &str) -> Self {
        CallArg::Str(s.to_string())
    }
}

impl From<String> for CallArg {
    fn from(s: String) -> Self {
        CallArg::Str(s)
    }
}

impl From<CallConfig> for CallArg {
    fn from(config: CallConfig) -> Self {
        CallArg::Config(config)
    }
}

/// Command line form: a JSON object is a config, anything else a string.
impl FromStr for CallArg {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.trim_start().starts_with('{') {
            return Ok(CallArg::Str(s.to_string()));
        }
        match serde_json::from_str(s) {
            Ok(Value::Object(object)) => Ok(CallArg::Config(CallConfig::from_object(object))),
            Ok(_) => Ok(CallArg::Str(s.to_string())),
            Err(err) => Err(Error::InvalidArgument(format!("{:?} is not a JSON object: {}", s, err))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedParams {
    pub namespace: Option<String>,
    pub resource_item: Option<String>,
    pub config: CallConfig,
}

impl ResolvedParams {
    fn require_namespace(self, namespaced: bool) -> Result<Self, Error> {
        let has_namespace = self.namespace.as_deref().map_or(false, |ns| !ns.is_empty());
        if namespaced && !has_namespace {
            return Err(Error::MissingNamespace);
        }
        Ok(self)
    }
}

/// Resolves `(namespace?, item?, config?)` from positional arguments.
///
/// | args                    | resolution                  |
/// |-------------------------|-----------------------------|
/// | `()`                    | nothing                     |
/// | `(ns)`                  | namespace                   |
/// | `(config)`              | config                      |
/// | `(ns, config)`          | namespace, config           |
/// | `(ns, item)`            | namespace, item             |
/// | `(ns, item, config)`    | namespace, item, config     |
///
/// Any other shape resolves to nothing. A namespaced resource without a
/// namespace fails with [`Error::MissingNamespace`].
pub fn resolve_params(namespaced: bool, args: &[CallArg]) -> Result<ResolvedParams, Error> {
    use CallArg::{Config, Str};

    let mut out = ResolvedParams::default();
    match args {
        [] => {}
        [Str(ns)] => out.namespace = Some(ns.clone()),
        [Config(config)] => out.config = config.clone(),
        [Str(ns), Config(config)] => {
            out.namespace = Some(ns.clone());
            out.config = config.clone();
        }
        [Str(ns), Str(item)] => {
            out.namespace = Some(ns.clone());
            out.resource_item = Some(item.clone());
        }
        [Str(ns), Str(item), Config(config)] => {
            out.namespace = Some(ns.clone());
            out.resource_item = Some(item.clone());
            out.config = config.clone();
        }
        _ => tracing::debug!(count = args.len(), "unrecognized argument shape, ignoring arguments"),
    }
    out.require_namespace(namespaced)
}

/// Named alternative to positional arguments.
///
/// ```
/// use kube_methods::CallArgs;
///
/// let args = CallArgs::new()
///     .namespace("default")
///     .item("web")
///     .query("pretty", "true");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallArgs {
    namespace: Option<String>,
    item: Option<String>,
    config: CallConfig,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn item<S: Into<String>>(mut self, item: S) -> Self {
        self.item = Some(item.into());
        self
    }

    /// Appends a query parameter; values are sent verbatim, without url-encoding.
    #[must_use]
    pub fn query<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.config
            .query
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn body<V: Into<Value>>(mut self, body: V) -> Self {
        self.config.body = Some(body.into());
        self
    }

    /// Unlike positional arguments, an item may be named without a namespace,
    /// which is how cluster-scoped items are addressed.
    pub fn resolve(self, namespaced: bool) -> Result<ResolvedParams, Error> {
        ResolvedParams {
            namespace: self.namespace,
            resource_item: self.item,
            config: self.config,
        }
        .require_namespace(namespaced)
    }
}
