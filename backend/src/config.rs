//! Server configuration.
//!
//! Values come from defaults, then the environment (a `.env` file is loaded
//! by the binary through `dotenvy`), then CLI flags.
//!
//! | Variable                     | Default   |
//! |------------------------------|-----------|
//! | `MATRIXOPS_HOST`             | `0.0.0.0` |
//! | `MATRIXOPS_PORT`             | `8000`    |
//! | `MATRIXOPS_MAX_UPLOAD_BYTES` | `5242880` |
//! | `MATRIXOPS_MATRIX_ERRORS`    | `internal`|

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use crate::error::{ServerError, ServerResult};
use crate::validation::MAX_UPLOAD_BYTES;

pub const ENV_HOST: &str = "MATRIXOPS_HOST";
pub const ENV_PORT: &str = "MATRIXOPS_PORT";
pub const ENV_MAX_UPLOAD_BYTES: &str = "MATRIXOPS_MAX_UPLOAD_BYTES";
pub const ENV_MATRIX_ERRORS: &str = "MATRIXOPS_MATRIX_ERRORS";

/// How matrix shape/content failures are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatrixErrorPolicy {
    /// 500 with a generic body; the parser's message is only logged.
    #[default]
    Internal,

    /// 400 with the parser's message.
    BadRequest,
}

impl FromStr for MatrixErrorPolicy {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "internal" | "server" | "500" => Ok(MatrixErrorPolicy::Internal),
            "client" | "bad-request" | "400" => Ok(MatrixErrorPolicy::BadRequest),
            other => Err(ServerError::Config(format!(
                "{} must be 'internal' or 'client', got '{}'",
                ENV_MATRIX_ERRORS, other
            ))),
        }
    }
}

/// Settings for the HTTP server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,

    /// Largest accepted file part, in bytes
    pub max_upload_bytes: u64,

    pub matrix_errors: MatrixErrorPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            matrix_errors: MatrixErrorPolicy::Internal,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `MATRIXOPS_*` environment variables.
    pub fn from_env() -> ServerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> ServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup(ENV_HOST) {
            config.host = parse_var(ENV_HOST, &host)?;
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.port = parse_var(ENV_PORT, &port)?;
        }
        if let Some(max) = lookup(ENV_MAX_UPLOAD_BYTES) {
            config.max_upload_bytes = parse_var(ENV_MAX_UPLOAD_BYTES, &max)?;
        }
        if let Some(policy) = lookup(ENV_MATRIX_ERRORS) {
            config.matrix_errors = policy.parse()?;
        }

        Ok(config)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T>(key: &str, value: &str) -> ServerResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ServerError::Config(format!("{} = '{}': {}", key, value, e)))
}
