use itertools::Itertools;
use serde_json::{Map, Value};

/// Joins path parts like a filesystem path join: empty and `.` segments are
/// dropped, `..` pops, and no trailing separator is kept.
fn join_path(parts: &[&str]) -> String {
    let absolute = parts.first().map_or(false, |p| p.starts_with('/'));
    let mut segments: Vec<&str> = Vec::new();
    for segment in parts.iter().flat_map(|p| p.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    let joined = segments.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Renders a query value the way string interpolation would: arrays are
/// comma separated, strings are not quoted.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(query_value).join(","),
        other => other.to_string(),
    }
}

/// Request path of a resource call.
///
/// Query parameters are appended in map order and are not url-encoded;
/// callers encode values themselves when they need to.
pub fn build_route(
    prefix: &str,
    namespace: Option<&str>,
    namespaced: bool,
    collection: &str,
    item: Option<&str>,
    query: Option<&Map<String, Value>>,
) -> String {
    let namespace_segment = if namespaced {
        format!("namespaces/{}", namespace.unwrap_or_default())
    } else {
        String::new()
    };
    let mut route = join_path(&[prefix, &namespace_segment, collection, item.unwrap_or_default()]);

    if let Some(query) = query.filter(|q| !q.is_empty()) {
        route.push('?');
        route.push_str(&query.iter().map(|(k, v)| format!("{}={}", k, query_value(v))).join("&"));
    }
    route
}
