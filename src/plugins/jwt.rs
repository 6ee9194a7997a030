//! JWT capability plugin.
//!
//! Wraps a routing subtree with a layer that pulls the bearer token out
//! of the configured header and decorates the request with a
//! [`JwtContext`]. Merged subtrees do not inherit layers from the
//! router they are merged into, so the factory re-applies this layer to
//! every controller subtree from the module's retained configuration.
//!
//! Token verification is an adapter concern and lives outside this
//! crate; guards consume the context (token + configured secret) and
//! decide.

use axum::body::Body;
use axum::http::Request;
use std::sync::Arc;
use tower::{Layer, Service};

/// Configuration for the JWT plugin.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Header carrying the bearer token.
    pub header: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            header: "authorization".to_string(),
        }
    }
}

/// Request decoration attached by [`JwtLayer`]; available to guards via
/// [`RequestContext::jwt`](crate::http::RequestContext).
#[derive(Debug, Clone)]
pub struct JwtContext {
    secret: Arc<str>,
    token: Option<String>,
}

impl JwtContext {
    /// The bearer token from the configured header, if one was sent.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

#[derive(Clone)]
pub struct JwtLayer {
    secret: Arc<str>,
    header: Arc<str>,
}

impl JwtLayer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: Arc::from(config.secret.as_str()),
            header: Arc::from(config.header.as_str()),
        }
    }
}

impl<S> Layer<S> for JwtLayer {
    type Service = JwtMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        JwtMiddleware {
            inner,
            secret: Arc::clone(&self.secret),
            header: Arc::clone(&self.header),
        }
    }
}

#[derive(Clone)]
pub struct JwtMiddleware<S> {
    inner: S,
    secret: Arc<str>,
    header: Arc<str>,
}

impl<S> Service<Request<Body>> for JwtMiddleware<S>
where
    S: Service<Request<Body>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let token = req
            .headers()
            .get(self.header.as_ref())
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);

        req.extensions_mut().insert(JwtContext {
            secret: Arc::clone(&self.secret),
            token,
        });
        self.inner.call(req)
    }
}
