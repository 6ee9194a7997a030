//! The request-time pipeline behind every mounted route.
//!
//! Built once at registration time, executed per request:
//! extract → validate supplied schemas → guards (sequential, short
//! circuit) → merge guard data → handler → error mapping. Routes
//! without guards skip the execution-context machinery entirely.

use crate::guard::{ExecutionContext, Guard};
use crate::http::RequestContext;
use crate::interceptor::ErrorHandler;
use crate::metadata::{ErasedHandler, HttpMethod};
use crate::plugins::JwtContext;
use crate::validation::{FieldIssue, SchemaSet};
use axum::body::{Body, to_bytes};
use axum::extract::{Query, RawPathParams, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing;
use axum::{Json, Router};
use serde_json::{Map, Value, json};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) struct RouteRuntime {
    pub(crate) controller: Arc<dyn Any + Send + Sync>,
    pub(crate) controller_name: &'static str,
    pub(crate) handler_name: &'static str,
    pub(crate) handler: ErasedHandler,
    pub(crate) schemas: SchemaSet,
    pub(crate) guards: Vec<Arc<dyn Guard>>,
    pub(crate) error_handler: Arc<dyn ErrorHandler>,
}

/// Mount a route runtime onto a router at `path`.
pub(crate) fn mount_route(
    runtime: Arc<RouteRuntime>,
    router: Router,
    path: &str,
    method: HttpMethod,
) -> Router {
    let handler = move |params: RawPathParams,
                        Query(query): Query<HashMap<String, String>>,
                        req: Request<Body>| {
        let runtime = Arc::clone(&runtime);
        async move { runtime.handle(params, query, req).await }
    };

    let method_router = match method {
        HttpMethod::Get => routing::get(handler),
        HttpMethod::Post => routing::post(handler),
        HttpMethod::Put => routing::put(handler),
        HttpMethod::Delete => routing::delete(handler),
        HttpMethod::Patch => routing::patch(handler),
    };
    router.route(path, method_router)
}

impl RouteRuntime {
    async fn handle(
        self: Arc<Self>,
        params: RawPathParams,
        query: HashMap<String, String>,
        req: Request<Body>,
    ) -> Response {
        let (parts, body) = req.into_parts();
        let params: HashMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let bytes = match to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return self
                    .error_handler
                    .internal(&format!("Failed to read request body: {}", e));
            }
        };
        let body_value: Option<Value> = if bytes.is_empty() {
            None
        } else {
            serde_json::from_slice(&bytes).ok()
        };

        if let Some(response) = self.validate(&params, &query, &parts.headers, &body_value) {
            return response;
        }

        let request = RequestContext {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            params,
            query,
            headers: parts.headers.clone(),
            body: body_value,
            data: Map::new(),
            jwt: parts.extensions.get::<JwtContext>().cloned(),
        };

        let request = if self.guards.is_empty() {
            request
        } else {
            let mut ctx = ExecutionContext::new(request, self.handler_name, self.controller_name);
            for guard in &self.guards {
                match guard.can_activate(&mut ctx).await {
                    Ok(true) => {}
                    Ok(false) => {
                        let status = ctx.response_status().unwrap_or(StatusCode::UNAUTHORIZED);
                        let mut response =
                            (status, Json(json!({ "error": "Unauthorized" }))).into_response();
                        response.headers_mut().extend(ctx.response_headers().clone());
                        return response;
                    }
                    Err(e) => return self.error_handler.internal(&e.to_string()),
                }
            }
            ctx.into_request()
        };

        let response = match (self.handler)(Arc::clone(&self.controller), request).await {
            Ok(response) => response,
            Err(e) => return self.error_handler.internal(&e.to_string()),
        };
        self.check_response(response).await
    }

    /// Validate only the schemas that were supplied; returns the 400
    /// response for the first failing one.
    fn validate(
        &self,
        params: &HashMap<String, String>,
        query: &HashMap<String, String>,
        headers: &axum::http::HeaderMap,
        body: &Option<Value>,
    ) -> Option<Response> {
        if let Some(schema) = &self.schemas.params {
            if let Err(issues) = schema.validate(&string_map_value(params)) {
                return Some(self.validation_response(&issues));
            }
        }
        if let Some(schema) = &self.schemas.query {
            if let Err(issues) = schema.validate(&string_map_value(query)) {
                return Some(self.validation_response(&issues));
            }
        }
        if let Some(schema) = &self.schemas.headers {
            if let Err(issues) = schema.validate(&header_map_value(headers)) {
                return Some(self.validation_response(&issues));
            }
        }
        if let Some(schema) = &self.schemas.body {
            let value = body.clone().unwrap_or(Value::Null);
            if let Err(issues) = schema.validate(&value) {
                return Some(self.validation_response(&issues));
            }
        }
        None
    }

    fn validation_response(&self, issues: &[FieldIssue]) -> Response {
        self.error_handler.validation("Request validation failed", issues)
    }

    /// Best-effort response-schema check, only when one was supplied.
    async fn check_response(&self, response: Response) -> Response {
        let Some(schema) = &self.schemas.response else {
            return response;
        };

        let (parts, body) = response.into_parts();
        let bytes = match to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return self
                    .error_handler
                    .internal(&format!("Failed to read response body: {}", e));
            }
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => {
                if let Err(issues) = schema.validate(&value) {
                    return self.error_handler.internal(&format!(
                        "Response validation failed: {}",
                        crate::validation::join_messages(&issues)
                    ));
                }
            }
            Err(_) => {
                return self
                    .error_handler
                    .internal("Response validation failed: body is not JSON");
            }
        }
        Response::from_parts(parts, Body::from(bytes))
    }
}

fn string_map_value(map: &HashMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

fn header_map_value(headers: &axum::http::HeaderMap) -> Value {
    let mut object = Map::new();
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            object.insert(name.as_str().to_string(), Value::String(value.to_string()));
        }
    }
    Value::Object(object)
}

/// Concatenate a controller base path with a route's path fragment.
pub(crate) fn join_paths(base: &str, fragment: &str) -> String {
    let base = base.trim_end_matches('/');
    let fragment = fragment.trim_start_matches('/');
    match (base.is_empty(), fragment.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{}", fragment),
        (false, true) => ensure_leading_slash(base),
        (false, false) => format!("{}/{}", ensure_leading_slash(base), fragment),
    }
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_handles_empty_fragments() {
        assert_eq!(join_paths("/users", ""), "/users");
        assert_eq!(join_paths("/users/", "/{id}"), "/users/{id}");
        assert_eq!(join_paths("", "/health"), "/health");
        assert_eq!(join_paths("", ""), "/");
        assert_eq!(join_paths("users", "{id}"), "/users/{id}");
    }

    #[test]
    fn header_values_become_an_object() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert("x-api-key", "secret".parse().unwrap());
        let value = header_map_value(&headers);
        assert_eq!(value["x-api-key"], "secret");
    }
}
