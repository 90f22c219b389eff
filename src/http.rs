//! HTTP requests and responses as plain data, and the request builder.
//!
//! [`build_request`] turns a registered endpoint, its validated parameters
//! and the client configuration into an [`HttpRequest`] without touching
//! the network. Executing it is the transport's job.

use crate::config::{ClientConfig, API_KEY_VAR, REFERER_HEADER, TITLE_HEADER};
use crate::error::{Error, Result};
use crate::registry::{EndpointConfig, Method};
use crate::schema::{ValidationError, Violation};
use serde_json::Value;

/// An HTTP request described as plain data
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value with this name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Build the request for `endpoint` from already-validated `params`.
///
/// Path placeholders are filled from (and removed from) the parameters.
/// Remaining parameters become the JSON body for POST/PATCH; GET requests
/// never carry a body.
pub fn build_request(
    endpoint: &EndpointConfig,
    params: &Value,
    config: &ClientConfig,
) -> Result<HttpRequest> {
    if endpoint.requires_auth && config.api_key().is_none() {
        return Err(Error::MissingApiKey {
            endpoint: endpoint.name,
            var: API_KEY_VAR,
        });
    }

    let mut remaining = match params {
        Value::Object(map) => map.clone(),
        Value::Null => serde_json::Map::new(),
        _ => {
            return Err(ValidationError::new(vec![Violation::new("$", "expected object")]).into())
        }
    };

    let mut path = endpoint.path.to_string();
    for name in endpoint.path_params() {
        let segment = match remaining.remove(name) {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(ValidationError::new(vec![Violation::new(
                    name,
                    "path parameter must be a string or number",
                )])
                .into())
            }
        };
        path = path.replace(&format!("{{{name}}}"), &segment);
    }

    let mut headers = vec![
        ("Accept".to_string(), "application/json".to_string()),
        ("Content-Type".to_string(), "application/json".to_string()),
    ];
    if let Some(key) = config.api_key() {
        headers.push(("Authorization".to_string(), format!("Bearer {key}")));
    }
    if let Some(referer) = config.referer() {
        headers.push((REFERER_HEADER.to_string(), referer.to_string()));
    }
    if let Some(title) = config.title() {
        headers.push((TITLE_HEADER.to_string(), title.to_string()));
    }
    for (name, value) in config.custom_headers() {
        headers.push((name.clone(), value.clone()));
    }

    let body = if endpoint.method.has_body() {
        Some(serde_json::to_string(&Value::Object(remaining))?)
    } else {
        None
    };

    Ok(HttpRequest {
        method: endpoint.method,
        url: format!("{}{}", config.base_url(), path),
        headers,
        body,
    })
}
