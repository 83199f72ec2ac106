//! `playground-config`: runtime configuration resolved once at startup.
//!
//! Every value comes from an environment variable with a local default.

pub mod env;

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

pub use env::{lookup_from_pairs, parsed_or, process_env, string_or};

pub const AGENT_SERVER_URL_VAR: &str = "AGENT_SERVER_URL";
pub const DEV_SERVER_URL_VAR: &str = "NYRA_DEV_SERVER_URL";

pub const DEFAULT_AGENT_SERVER_URL: &str = "http://localhost:8080";
pub const DEFAULT_DEV_SERVER_URL: &str = "http://localhost:49483";

/// Upstream base URLs the edge rewrites to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendUrls {
    /// Agent server: `/api/agents/`, `/api/vector/`, `/api/token/`.
    pub agent_server: String,
    /// Dev server: `/api/dev/`.
    pub dev_server: String,
}

impl Default for BackendUrls {
    fn default() -> Self {
        Self {
            agent_server: DEFAULT_AGENT_SERVER_URL.to_string(),
            dev_server: DEFAULT_DEV_SERVER_URL.to_string(),
        }
    }
}

impl BackendUrls {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            agent_server: string_or(lookup, AGENT_SERVER_URL_VAR, DEFAULT_AGENT_SERVER_URL),
            dev_server: string_or(lookup, DEV_SERVER_URL_VAR, DEFAULT_DEV_SERVER_URL),
        }
    }
}

/// Playground runtime configuration.
#[derive(Debug, Clone, Serialize)]
pub struct PlaygroundConfig {
    pub backends: BackendUrls,
    /// HTTP gateway bind address
    pub bind_address: String,
    /// HTTP gateway port
    pub port: u16,
    /// Base URL the remote graph API client calls
    pub api_base_url: String,
    /// Directory holding the local options storage
    pub state_dir: PathBuf,
    pub http_timeout: Duration,
    /// Log level
    pub log_level: String,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            backends: BackendUrls::default(),
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            api_base_url: "http://localhost:3000/api/dev".to_string(),
            state_dir: default_state_dir(),
            http_timeout: Duration::from_secs(30),
            log_level: "info".to_string(),
        }
    }
}

impl PlaygroundConfig {
    /// Load configuration from environment variables with local defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            backends: BackendUrls::from_lookup(lookup),
            bind_address: string_or(lookup, "PLAYGROUND_BIND", &defaults.bind_address),
            port: parsed_or(lookup, "PLAYGROUND_PORT", defaults.port),
            api_base_url: string_or(lookup, "PLAYGROUND_API_BASE", &defaults.api_base_url),
            state_dir: lookup("PLAYGROUND_STATE_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.state_dir),
            http_timeout: Duration::from_secs(parsed_or(
                lookup,
                "PLAYGROUND_HTTP_TIMEOUT_SECS",
                30u64,
            )),
            log_level: string_or(lookup, "RUST_LOG", &defaults.log_level),
        }
    }
}

/// Resolve the default state directory: `~/.nyra-playground`, or a relative
/// directory when no home is known.
pub fn default_state_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".nyra-playground"),
        None => PathBuf::from(".nyra-playground"),
    }
}
