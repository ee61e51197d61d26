/// Client configuration
///
/// Resolved in layers: defaults, then the JSON config file, then `VPE_*`
/// environment variables, then whatever the caller sets explicitly.
use crate::error::ClientError;
use crate::poll::PollPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

pub const ENV_API_URL: &str = "VPE_API_URL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "VPE_HTTP_TIMEOUT_SECS";
pub const ENV_POLL_ATTEMPTS: &str = "VPE_POLL_ATTEMPTS";
pub const ENV_POLL_INTERVAL_MS: &str = "VPE_POLL_INTERVAL_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service root, including the `/api/v1` prefix
    pub base_url: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: Option<u64>,

    pub connect_timeout_secs: Option<u64>,

    pub user_agent: String,

    /// Job polling policy
    pub poll: PollPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: Some(300),
            connect_timeout_secs: Some(10),
            user_agent: format!("vpe/{}", env!("CARGO_PKG_VERSION")),
            poll: PollPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Base URL without a trailing slash.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Rejects anything that is not an http(s) URL.
    pub fn validate(&self) -> Result<(), ClientError> {
        let base = self.base();
        if base.starts_with("http://") || base.starts_with("https://") {
            Ok(())
        } else {
            Err(ClientError::Config(format!(
                "base URL must start with http:// or https://, got {:?}",
                self.base_url
            )))
        }
    }

    /// Save configuration to JSON
    pub fn save(&self, path: &Path) -> Result<(), ClientError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from JSON
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// `<config dir>/vpe/client.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vpe").join("client.json"))
    }

    /// Loads `path` (or the default location) when it exists, defaults
    /// otherwise. A file that exists but does not parse is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ClientError> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path(),
        };

        match path {
            Some(path) if path.exists() => {
                debug!("Loading client config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Overlays the `VPE_*` process environment.
    pub fn with_env(self) -> Self {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlays variables read through `lookup`. Values that do not parse
    /// are ignored with a warning.
    pub fn apply_env_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(secs) = parse_var(&lookup, ENV_HTTP_TIMEOUT_SECS) {
            self.timeout_secs = Some(secs);
        }
        if let Some(attempts) = parse_var(&lookup, ENV_POLL_ATTEMPTS) {
            self.poll.max_attempts = attempts;
        }
        if let Some(ms) = parse_var(&lookup, ENV_POLL_INTERVAL_MS) {
            self.poll.interval_ms = ms;
        }
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a number", key, raw);
            None
        }
    }
}
