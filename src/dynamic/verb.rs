use crate::{
    error::Error,
    k8s_client::{HttpRequest, RawResponse},
};
use reqwest::Method;
use serde_json::{json, Value};
use std::{convert::Infallible, fmt, str::FromStr};

pub const JSON: &str = "application/json";
pub const STRATEGIC_MERGE_PATCH: &str = "application/strategic-merge-patch+json";

/// A discovery verb. Tokens without a transport mapping are kept as
/// [`Verb::Other`] and only fail once called.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
    Create,
    Delete,
    DeleteCollection,
    Get,
    List,
    Update,
    Patch,
    Other(String),
}

impl From<&str> for Verb {
    fn from(s: &str) -> Self {
        match s {
            "create" => Verb::Create,
            "delete" => Verb::Delete,
            "deletecollection" => Verb::DeleteCollection,
            "get" => Verb::Get,
            "list" => Verb::List,
            "update" => Verb::Update,
            "patch" => Verb::Patch,
            other => Verb::Other(other.to_string()),
        }
    }
}

impl FromStr for Verb {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Verb::from(s))
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Verb::Create => "create",
            Verb::Delete => "delete",
            Verb::DeleteCollection => "deletecollection",
            Verb::Get => "get",
            Verb::List => "list",
            Verb::Update => "update",
            Verb::Patch => "patch",
            Verb::Other(other) => other,
        };
        f.write_str(token)
    }
}

impl Verb {
    /// Turns a built route into the transport request for this verb.
    /// Only create, update and patch carry `body`.
    pub fn dispatch(&self, route: String, body: Option<&Value>) -> Result<HttpRequest, Error> {
        let (method, content_type) = match self {
            Verb::Create => (Method::POST, Some(JSON)),
            Verb::Delete | Verb::DeleteCollection => (Method::DELETE, None),
            Verb::Get | Verb::List => (Method::GET, None),
            Verb::Update => (Method::PUT, Some(JSON)),
            Verb::Patch => (Method::PATCH, Some(STRATEGIC_MERGE_PATCH)),
            Verb::Other(verb) => return Err(Error::UnsupportedVerb(verb.clone())),
        };

        let mut req = HttpRequest::new(method, route);
        if let Some(content_type) = content_type {
            req.content_type = Some(content_type);
            req.body = body.map(serde_json::to_vec).transpose()?;
        }
        Ok(req)
    }
}

/// Result of a call: the decoded body when there is one, the raw response otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum Output {
    Data(Value),
    Raw(RawResponse),
}

/// `null`, `false`, `0` and `""` count as no data.
fn is_empty_data(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

impl From<RawResponse> for Output {
    fn from(resp: RawResponse) -> Self {
        match resp.data() {
            Some(data) if !is_empty_data(&data) => Output::Data(data),
            _ => Output::Raw(resp),
        }
    }
}

impl Output {
    pub fn into_value(self) -> Value {
        match self {
            Output::Data(data) => data,
            Output::Raw(resp) => json!({ "status": resp.status.as_u16() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn verb(token: &str) -> Verb {
        token.parse().unwrap()
    }

    #[test]
    fn tokens_round_trip() {
        for token in &["create", "delete", "deletecollection", "get", "list", "update", "patch", "watch"] {
            assert_eq!(verb(token).to_string(), *token);
        }
        assert_eq!(verb("watch"), Verb::Other("watch".into()));
    }

    #[test]
    fn payload_verbs_carry_body_and_content_type() {
        let body = json!({"metadata": {"name": "web"}});

        let req = verb("create").dispatch("api/v1/pods".into(), Some(&body)).unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.content_type, Some(JSON));
        assert_eq!(req.body, Some(serde_json::to_vec(&body).unwrap()));

        let req = verb("update").dispatch("api/v1/pods/web".into(), Some(&body)).unwrap();
        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.content_type, Some(JSON));

        let req = verb("patch").dispatch("api/v1/pods/web".into(), Some(&body)).unwrap();
        assert_eq!(req.method, Method::PATCH);
        assert_eq!(req.content_type, Some(STRATEGIC_MERGE_PATCH));
        assert_eq!(req.relative_url, "api/v1/pods/web");
    }

    #[test]
    fn patch_without_body_still_sets_content_type() {
        let req = verb("patch").dispatch("api/v1/pods/web".into(), None).unwrap();
        assert_eq!(req.content_type, Some(STRATEGIC_MERGE_PATCH));
        assert_eq!(req.body, None);
    }

    #[test]
    fn read_and_delete_verbs_never_carry_body() {
        let body = json!({"ignored": true});
        for (token, method) in &[
            ("delete", Method::DELETE),
            ("deletecollection", Method::DELETE),
            ("get", Method::GET),
            ("list", Method::GET),
        ] {
            let req = verb(token).dispatch("api/v1/pods".into(), Some(&body)).unwrap();
            assert_eq!(&req.method, method);
            assert_eq!(req.body, None);
            assert_eq!(req.content_type, None);
        }
    }

    #[test]
    fn unknown_verb_is_unsupported() {
        let err = verb("watch").dispatch("api/v1/pods".into(), None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVerb(v) if v == "watch"));
    }

    #[test]
    fn output_prefers_body() {
        let data = Output::from(RawResponse {
            status: StatusCode::OK,
            body: br#"{"kind":"Pod"}"#.to_vec(),
        });
        assert_eq!(data, Output::Data(json!({"kind": "Pod"})));

        let raw = Output::from(RawResponse {
            status: StatusCode::ACCEPTED,
            body: Vec::new(),
        });
        assert_eq!(raw.into_value(), json!({"status": 202}));
    }

    #[test]
    fn falsy_body_is_returned_raw() {
        for body in &["null", "false", "0", "\"\""] {
            let out = Output::from(RawResponse {
                status: StatusCode::OK,
                body: body.as_bytes().to_vec(),
            });
            assert!(matches!(out, Output::Raw(_)), "{} should be raw", body);
        }
        let out = Output::from(RawResponse {
            status: StatusCode::OK,
            body: b"[]".to_vec(),
        });
        assert_eq!(out, Output::Data(json!([])));
    }
}
