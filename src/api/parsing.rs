use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde_json::Value;

use crate::errors::MbotcError;

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

/// `multipart/form-data; boundary=x` -> `multipart/form-data`
#[must_use]
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// The parts of an API Gateway / function URL proxy event the handlers use.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: String,
    pub path: String,
    pub headers: Value,
    pub body: Bytes,
}

impl ProxyRequest {
    /// Reads a payload-format 2.0 event, falling back to 1.0 field names.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when the event has no path or its base64 body
    /// does not decode.
    pub fn from_event(payload: &Value) -> Result<Self, MbotcError> {
        let method = v_str(payload, &["requestContext", "http", "method"])
            .or_else(|| v_str(payload, &["httpMethod"]))
            .unwrap_or_default()
            .to_ascii_uppercase();

        let path = v_str(payload, &["rawPath"])
            .or_else(|| v_str(payload, &["path"]))
            .ok_or_else(|| MbotcError::ParseError("Request missing path".to_string()))?
            .to_string();

        let headers = payload.get("headers").cloned().unwrap_or(Value::Null);

        let raw_body = payload.get("body").and_then(Value::as_str).unwrap_or_default();
        let is_base64 = payload
            .get("isBase64Encoded")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let body = if is_base64 {
            STANDARD
                .decode(raw_body)
                .map(Bytes::from)
                .map_err(|e| MbotcError::ParseError(format!("Invalid base64 body: {e}")))?
        } else {
            Bytes::copy_from_slice(raw_body.as_bytes())
        };

        Ok(Self {
            method,
            path,
            headers,
            body,
        })
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        get_header_value(&self.headers, name)
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        self.header("Content-Type").unwrap_or_default()
    }

    /// Whether the request path ends with `route`; API Gateway stages prefix it.
    #[must_use]
    pub fn is_route(&self, route: &str) -> bool {
        self.path.trim_end_matches('/').ends_with(route)
    }

    /// # Errors
    ///
    /// Returns `ParseError` when the body is not UTF-8.
    pub fn body_str(&self) -> Result<&str, MbotcError> {
        std::str::from_utf8(&self.body)
            .map_err(|e| MbotcError::ParseError(format!("Body is not UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_v2_event_with_base64_body() {
        let event = json!({
            "rawPath": "/api/v1/create-notification-with-button",
            "requestContext": { "http": { "method": "post" } },
            "headers": { "content-type": "application/json" },
            "body": STANDARD.encode("{\"post_id\":\"p1\"}"),
            "isBase64Encoded": true
        });
        let request = ProxyRequest::from_event(&event).unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.content_type(), "application/json");
        assert_eq!(request.body_str().unwrap(), "{\"post_id\":\"p1\"}");
        assert!(request.is_route("/api/v1/create-notification-with-button"));
    }

    #[test]
    fn reads_v1_event() {
        let event = json!({
            "path": "/prod/command",
            "httpMethod": "POST",
            "headers": {},
            "body": "token=t"
        });
        let request = ProxyRequest::from_event(&event).unwrap();
        assert!(request.is_route("/command"));
        assert_eq!(request.body_str().unwrap(), "token=t");
    }

    #[test]
    fn rejects_event_without_path() {
        assert!(ProxyRequest::from_event(&json!({ "body": "" })).is_err());
    }

    #[test]
    fn media_type_drops_parameters() {
        assert_eq!(
            media_type("Multipart/Form-Data; boundary=abc"),
            "multipart/form-data"
        );
        assert_eq!(media_type(""), "");
    }
}
