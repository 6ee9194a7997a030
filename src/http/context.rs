use crate::error::Result;
use crate::plugins::JwtContext;
use axum::http::{HeaderMap, Method};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// The per-request bundle handed to route handlers.
///
/// `data` starts empty and receives whatever guards attached to their
/// execution context before the handler ran (e.g. an authenticated
/// principal).
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    /// Parsed JSON body, when the request carried one that parsed.
    pub body: Option<Value>,
    /// Free-form data merged in from guard execution contexts.
    pub data: Map<String, Value>,
    /// Present when the owning module declared the JWT plugin.
    pub jwt: Option<JwtContext>,
}

impl RequestContext {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Deserialize the JSON body into a concrete type.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T> {
        let body = self
            .body
            .clone()
            .ok_or_else(|| crate::error::Error::internal("Request has no JSON body"))?;
        Ok(serde_json::from_value(body)?)
    }
}
