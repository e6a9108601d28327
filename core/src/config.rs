//! Client configuration.
//!
//! Values come from code, from any serde source, or from the environment:
//!
//! | Variable               | Field        | Default |
//! |------------------------|--------------|---------|
//! | `REALFORCE_API_TOKEN`  | `api_token`  | none    |
//! | `REALFORCE_VERIFY_SSL` | `verify_ssl` | `true`  |
//! | `REALFORCE_TIMEOUT`    | `timeout`    | `10`    |

use serde::Deserialize;
use tracing::warn;

use crate::client::RealforceClient;

pub const API_TOKEN_VAR: &str = "REALFORCE_API_TOKEN";
pub const VERIFY_SSL_VAR: &str = "REALFORCE_VERIFY_SSL";
pub const TIMEOUT_VAR: &str = "REALFORCE_TIMEOUT";

/// Connection settings applied to a `RealforceClient`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_token: Option<String>,
    pub verify_ssl: bool,
    /// Default request timeout in seconds.
    pub timeout: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            verify_ssl: true,
            timeout: RealforceClient::TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`. Unparseable values fall back
    /// to the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(token) = lookup(API_TOKEN_VAR).filter(|t| !t.is_empty()) {
            config.api_token = Some(token);
        }

        if let Some(raw) = lookup(VERIFY_SSL_VAR) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "0" | "false" | "no" | "off" => config.verify_ssl = false,
                "1" | "true" | "yes" | "on" => config.verify_ssl = true,
                _ => warn!(value = %raw, "ignoring unrecognized {VERIFY_SSL_VAR}"),
            }
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            match raw.trim().parse() {
                Ok(seconds) => config.timeout = seconds,
                Err(_) => warn!(value = %raw, "ignoring unparseable {TIMEOUT_VAR}"),
            }
        }

        config
    }
}
