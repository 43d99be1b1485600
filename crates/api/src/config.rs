//! HTTP server configuration.

use axum::http::{HeaderValue, Method};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid allowed origin '{0}'")]
    InvalidOrigin(String),
}

/// Everything the HTTP layer needs; built once by the binary.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Socket address to listen on, e.g. `0.0.0.0:5003`.
    pub bind: String,
    /// Path prefix every route is mounted under.
    pub prefix: String,
    /// Origins allowed by CORS; `*` allows any.
    pub allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5003".into(),
            prefix: "/api".into(),
            allowed_origins: vec!["*".into()],
        }
    }
}

impl ApiConfig {
    /// The prefix with a leading `/` and no trailing `/`; empty for the root.
    pub fn normalized_prefix(&self) -> String {
        let trimmed = self.prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }

    pub fn cors_layer(&self) -> Result<CorsLayer, ConfigError> {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any);

        if self.allowed_origins.iter().any(|origin| origin == "*") {
            return Ok(layer.allow_origin(Any));
        }

        let origins = self
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| ConfigError::InvalidOrigin(origin.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(layer.allow_origin(AllowOrigin::list(origins)))
    }
}
