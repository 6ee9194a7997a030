//! CORS plugin, a thin adapter over `tower_http::cors`.

use crate::error::{Error, Result};
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Configuration for the CORS plugin. Empty lists mean "allow any".
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    pub allow_credentials: bool,
}

pub(crate) fn build_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let mut layer = CorsLayer::new();

    if config.allow_origins.is_empty() {
        layer = layer.allow_origin(Any);
    } else {
        let origins = config
            .allow_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| Error::config(format!("Invalid CORS origin: {}", origin)))
            })
            .collect::<Result<Vec<_>>>()?;
        layer = layer.allow_origin(origins);
    }

    if config.allow_methods.is_empty() {
        layer = layer.allow_methods(Any);
    } else {
        let methods = config
            .allow_methods
            .iter()
            .map(|method| {
                Method::from_bytes(method.as_bytes())
                    .map_err(|_| Error::config(format!("Invalid CORS method: {}", method)))
            })
            .collect::<Result<Vec<_>>>()?;
        layer = layer.allow_methods(methods);
    }

    if config.allow_headers.is_empty() {
        layer = layer.allow_headers(Any);
    } else {
        let headers = config
            .allow_headers
            .iter()
            .map(|header| {
                HeaderName::from_bytes(header.as_bytes())
                    .map_err(|_| Error::config(format!("Invalid CORS header: {}", header)))
            })
            .collect::<Result<Vec<_>>>()?;
        layer = layer.allow_headers(headers);
    }

    if config.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    Ok(layer)
}
