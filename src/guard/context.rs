use crate::http::RequestContext;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde_json::{Map, Value};

/// Per-request context constructed for guarded routes.
///
/// Guards observe the request, may write to the `data` bag, and may set
/// a response status before rejecting. Once every guard has passed, the
/// bag is merged into the request context so the handler (and later
/// guards, during evaluation) see earlier guards' writes.
pub struct ExecutionContext {
    request: RequestContext,
    handler_name: &'static str,
    controller_name: &'static str,
    /// Free-form data; merged into the request context when all guards pass.
    pub data: Map<String, Value>,
    response_status: Option<StatusCode>,
    response_headers: HeaderMap,
}

impl ExecutionContext {
    pub(crate) fn new(
        request: RequestContext,
        handler_name: &'static str,
        controller_name: &'static str,
    ) -> Self {
        Self {
            request,
            handler_name,
            controller_name,
            data: Map::new(),
            response_status: None,
            response_headers: HeaderMap::new(),
        }
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    /// Name of the handler method about to be invoked.
    pub fn handler_name(&self) -> &'static str {
        self.handler_name
    }

    pub fn controller_name(&self) -> &'static str {
        self.controller_name
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    /// Override the rejection status. Only consulted when a guard
    /// returns `false`; the default is 401.
    pub fn set_status(&mut self, status: StatusCode) {
        self.response_status = Some(status);
    }

    pub fn set_response_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.response_headers.insert(name, value);
    }

    pub(crate) fn response_status(&self) -> Option<StatusCode> {
        self.response_status
    }

    pub(crate) fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    /// Fold the bag into the request context for the handler.
    pub(crate) fn into_request(self) -> RequestContext {
        let mut request = self.request;
        request.data.extend(self.data);
        request
    }
}
