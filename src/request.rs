use http::Method;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Read-only projection of an inbound request, as the parsers consume it.
///
/// Implement this for your transport's request type; [`ParsedRequest`] is a
/// bundled implementation for callers without a richer request object.
pub trait RawRequest {
    /// Parsed query parameters, `None` when the request target carries no
    /// query string at all (a bare `?` yields an empty mapping instead).
    fn query_params(&self) -> Option<&Map<String, Value>>;

    /// Request headers with lowercased names, when available.
    fn headers(&self) -> Option<&HashMap<String, String>>;

    /// Raw request body, when one was supplied.
    fn raw_body(&self) -> Option<&str>;
}

/// Parsed HTTP request data: the bundled [`RawRequest`] implementation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    headers: HashMap<String, String>,
    query: Option<Map<String, Value>>,
    body: Option<String>,
}

impl ParsedRequest {
    /// Build a request view from a method, a request target (path plus
    /// optional query string), header pairs, and an optional body.
    ///
    /// Header names are lowercased on ingestion. The query string is parsed
    /// with `form_urlencoded`; bracket notation groups nested parameters, so
    /// `fields[posts]=a,b` becomes `{"fields": {"posts": "a,b"}}`.
    pub fn new<I, K, V>(method: Method, target: &str, headers: I, body: Option<String>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let headers: HashMap<String, String> = headers
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
            .collect();
        let path = target.split('?').next().unwrap_or("/").to_string();
        let query = parse_query_params(target);

        debug!(
            method = %method,
            path = %path,
            header_count = headers.len(),
            query_present = query.is_some(),
            body_bytes = body.as_ref().map(String::len),
            "request parsed"
        );

        Self {
            method,
            path,
            headers,
            query,
            body,
        }
    }
}

impl RawRequest for ParsedRequest {
    fn query_params(&self) -> Option<&Map<String, Value>> {
        self.query.as_ref()
    }

    fn headers(&self) -> Option<&HashMap<String, String>> {
        Some(&self.headers)
    }

    fn raw_body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Parse the query string of a request target into a parameter mapping.
///
/// Returns `None` when the target has no `?`. Plain keys map to string
/// values with last-write-wins on repetition; bracketed keys
/// (`filter[state]=active`) are grouped into nested objects under the outer
/// key. A plain write over a previously grouped key replaces the group.
pub fn parse_query_params(target: &str) -> Option<Map<String, Value>> {
    let pos = target.find('?')?;
    let query_str = &target[pos + 1..];

    let mut params = Map::new();
    for (key, value) in url::form_urlencoded::parse(query_str.as_bytes()) {
        match split_bracket_key(&key) {
            Some((outer, inner)) => {
                let group = params
                    .entry(outer.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !group.is_object() {
                    *group = Value::Object(Map::new());
                }
                if let Value::Object(map) = group {
                    map.insert(inner.to_string(), Value::String(value.to_string()));
                }
            }
            None => {
                params.insert(key.to_string(), Value::String(value.to_string()));
            }
        }
    }
    Some(params)
}

/// Split `outer[inner]` into its components; `None` for plain keys.
fn split_bracket_key(key: &str) -> Option<(&str, &str)> {
    let open = key.find('[')?;
    if !key.ends_with(']') || open == 0 {
        return None;
    }
    Some((&key[..open], &key[open + 1..key.len() - 1]))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_query_params_plain_keys() {
        let q = parse_query_params("/p?x=1&y=2").unwrap();
        assert_eq!(q.get("x"), Some(&json!("1")));
        assert_eq!(q.get("y"), Some(&json!("2")));
    }

    #[test]
    fn test_parse_query_params_bracket_grouping() {
        let q = parse_query_params("/p?fields[posts]=a,b&fields[tags]=c&filter[state]=open")
            .unwrap();
        assert_eq!(
            q.get("fields"),
            Some(&json!({"posts": "a,b", "tags": "c"}))
        );
        assert_eq!(q.get("filter"), Some(&json!({"state": "open"})));
    }

    #[test]
    fn test_absent_query_string_is_none() {
        assert!(parse_query_params("/p").is_none());
        let empty = parse_query_params("/p?").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_repeated_plain_key_keeps_last_write() {
        let q = parse_query_params("/p?x=1&x=2").unwrap();
        assert_eq!(q.get("x"), Some(&json!("2")));
    }

    #[test]
    fn test_headers_lowercased() {
        let req = ParsedRequest::new(
            Method::GET,
            "/p",
            vec![("Content-Type", "application/json")],
            None,
        );
        assert_eq!(
            req.headers().unwrap().get("content-type"),
            Some(&"application/json".to_string())
        );
    }
}
