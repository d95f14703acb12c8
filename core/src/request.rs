//! Binds parameters into a concrete `HttpRequest` for one `Operation`.

use std::borrow::Cow;

use serde::Serialize;

use crate::error::ClientError;
use crate::http::HttpRequest;
use crate::operation::Operation;

/// Builder for a single request.
///
/// Path parameters are percent-encoded as whole segments, so a value
/// containing `/`, or a value of `.` or `..`, cannot escape its placeholder.
/// Query parameters keep their insertion order.
#[derive(Debug, Clone)]
pub struct RequestBuilder<'a> {
    base_url: &'a str,
    operation: &'a Operation,
    path_params: Vec<(&'a str, &'a str)>,
    query: Vec<(&'a str, &'a str)>,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(base_url: &'a str, operation: &'a Operation) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/'),
            operation,
            path_params: Vec::new(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn path_param(mut self, name: &'a str, value: &'a str) -> Self {
        self.path_params.push((name, value));
        self
    }

    pub fn query_param(mut self, name: &'a str, value: &'a str) -> Self {
        self.query.push((name, value));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    pub fn headers<'h, I>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = &'h (String, String)>,
    {
        for (name, value) in headers {
            self = self.header(name, value);
        }
        self
    }

    /// Serialize `body` as the JSON request payload.
    pub fn json_body<T: Serialize>(mut self, body: &T) -> Result<Self, ClientError> {
        let json = serde_json::to_string(body).map_err(|e| {
            ClientError::MalformedRequest(format!("{}: cannot serialize body: {e}", self.operation.id))
        })?;
        self.body = Some(json);
        Ok(self)
    }

    pub fn build(self) -> Result<HttpRequest, ClientError> {
        let op = self.operation;
        let mut url = String::with_capacity(self.base_url.len() + op.path.len());
        url.push_str(self.base_url);

        let mut rest = op.path;
        while let Some(start) = rest.find('{') {
            url.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let end = after.find('}').ok_or_else(|| {
                ClientError::MalformedRequest(format!("{}: unclosed placeholder in `{}`", op.id, op.path))
            })?;
            let name = &after[..end];
            let value = self
                .path_params
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| *v)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    ClientError::MalformedRequest(format!("{}: missing path parameter `{name}`", op.id))
                })?;
            url.push_str(&encode_segment(value));
            rest = &after[end + 1..];
        }
        url.push_str(rest);

        if let Some((unknown, _)) = self
            .path_params
            .iter()
            .find(|(n, _)| !op.path_params().any(|p| p == *n))
        {
            return Err(ClientError::MalformedRequest(format!(
                "{}: unknown path parameter `{unknown}`",
                op.id
            )));
        }

        for (i, (name, value)) in self.query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&urlencoding::encode(name));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        let mut headers = self.headers;
        if self.body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }

        Ok(HttpRequest {
            method: op.method,
            url,
            headers,
            body: self.body,
        })
    }
}

/// Percent-encode one path segment. Dot segments are encoded too, since
/// `urlencoding` leaves `.` alone and a normalizing hop would collapse them.
fn encode_segment(value: &str) -> Cow<'_, str> {
    match value {
        "." => Cow::Borrowed("%2E"),
        ".." => Cow::Borrowed("%2E%2E"),
        _ => urlencoding::encode(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::operation::{DELETE_RESOURCE, LIST_RESOURCE_TYPES, OVERWRITE_POLICY, RESOURCE_ROLES};

    const BASE: &str = "http://sam.test";

    #[test]
    fn substitutes_every_placeholder() {
        let req = RequestBuilder::new(BASE, &RESOURCE_ROLES)
            .path_param("resourceTypeName", "workspace")
            .path_param("resourceId", "ws-1")
            .build()
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://sam.test/api/resource/workspace/ws-1/roles");
        assert!(req.body.is_none());
    }

    #[test]
    fn percent_encodes_path_segments() {
        let req = RequestBuilder::new(BASE, &RESOURCE_ROLES)
            .path_param("resourceTypeName", "workspace")
            .path_param("resourceId", "my ws/1?x")
            .build()
            .unwrap();
        assert_eq!(req.url, "http://sam.test/api/resource/workspace/my%20ws%2F1%3Fx/roles");
    }

    #[test]
    fn dot_segments_are_encoded() {
        let req = RequestBuilder::new(BASE, &DELETE_RESOURCE)
            .path_param("resourceTypeName", "workspace")
            .path_param("resourceId", "..")
            .build()
            .unwrap();
        assert_eq!(req.url, "http://sam.test/api/resource/workspace/%2E%2E");

        let req = RequestBuilder::new(BASE, &RESOURCE_ROLES)
            .path_param("resourceTypeName", "workspace")
            .path_param("resourceId", ".")
            .build()
            .unwrap();
        assert_eq!(req.url, "http://sam.test/api/resource/workspace/%2E/roles");

        let req = RequestBuilder::new(BASE, &RESOURCE_ROLES)
            .path_param("resourceTypeName", "workspace")
            .path_param("resourceId", "...")
            .build()
            .unwrap();
        assert_eq!(req.url, "http://sam.test/api/resource/workspace/.../roles");
    }

    #[test]
    fn missing_path_parameter_is_malformed() {
        let err = RequestBuilder::new(BASE, &RESOURCE_ROLES)
            .path_param("resourceTypeName", "workspace")
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientError::MalformedRequest(ref m) if m.contains("resourceId")));
    }

    #[test]
    fn empty_path_parameter_is_malformed() {
        let err = RequestBuilder::new(BASE, &RESOURCE_ROLES)
            .path_param("resourceTypeName", "workspace")
            .path_param("resourceId", "")
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientError::MalformedRequest(_)));
    }

    #[test]
    fn unknown_path_parameter_is_malformed() {
        let err = RequestBuilder::new(BASE, &LIST_RESOURCE_TYPES)
            .path_param("resourceId", "ws-1")
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientError::MalformedRequest(ref m) if m.contains("unknown")));
    }

    #[test]
    fn unclosed_placeholder_is_malformed() {
        let broken = Operation {
            id: "broken",
            method: HttpMethod::Get,
            path: "/api/resource/{resourceTypeName",
            success_status: 200,
        };
        let err = RequestBuilder::new(BASE, &broken)
            .path_param("resourceTypeName", "workspace")
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientError::MalformedRequest(ref m) if m.contains("unclosed")));
    }

    #[test]
    fn query_parameters_are_encoded_in_order() {
        let req = RequestBuilder::new(BASE, &LIST_RESOURCE_TYPES)
            .query_param("filter", "a b")
            .query_param("limit", "10")
            .build()
            .unwrap();
        assert_eq!(req.url, "http://sam.test/api/resourceTypes?filter=a%20b&limit=10");
    }

    #[test]
    fn json_body_sets_content_type() {
        let body = serde_json::json!({"roles": ["reader"]});
        let req = RequestBuilder::new(BASE, &OVERWRITE_POLICY)
            .path_param("resourceTypeName", "workspace")
            .path_param("resourceId", "ws-1")
            .path_param("policyName", "readers")
            .header("Accept", "application/json")
            .json_body(&body)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("accept"), Some("application/json"));
        let sent: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let req = RequestBuilder::new("http://sam.test/", &LIST_RESOURCE_TYPES).build().unwrap();
        assert_eq!(req.url, "http://sam.test/api/resourceTypes");
    }
}
