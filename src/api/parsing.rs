use base64::{Engine as _, engine::general_purpose};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ServiceError;

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// HTTP method of an API Gateway (REST or HTTP API) or Function URL event.
#[must_use]
pub fn http_method(event: &Value) -> Option<&str> {
    v_str(event, &["httpMethod"]).or_else(|| v_str(event, &["requestContext", "http", "method"]))
}

#[must_use]
pub fn is_preflight(event: &Value) -> bool {
    http_method(event).is_some_and(|m| m.eq_ignore_ascii_case("OPTIONS"))
}

/// Header from the event, matched case-insensitively.
#[must_use]
pub fn event_header<'a>(event: &'a Value, name: &str) -> Option<&'a str> {
    event
        .get("headers")
        .and_then(|headers| get_header_value(headers, name))
}

/// Raw request body, base64-decoded when the event says so.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidRequest`] if a base64 body is malformed or
/// not UTF-8.
pub fn extract_body(event: &Value) -> Result<String, ServiceError> {
    let body = match event.get("body") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        // Direct invocations may pass the JSON body inline.
        Some(other) => return Ok(other.to_string()),
    };

    let encoded = event
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !encoded {
        return Ok(body);
    }

    let bytes = general_purpose::STANDARD
        .decode(body.as_bytes())
        .map_err(|e| ServiceError::InvalidRequest(format!("Invalid base64 body: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| ServiceError::InvalidRequest(format!("Body is not UTF-8: {e}")))
}

/// Deserializes the request body. An empty body reads as `{}`.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidRequest`] when the body is not valid JSON
/// for `T`.
pub fn parse_json_body<T: DeserializeOwned>(event: &Value) -> Result<T, ServiceError> {
    let body = extract_body(event)?;
    let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
    serde_json::from_str(body)
        .map_err(|e| ServiceError::InvalidRequest(format!("Invalid JSON body: {e}")))
}
