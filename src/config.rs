//! Configuration file handling for avatar-relay.
//!
//! Loads configuration from `<config dir>/avatar-relay/config.toml` or a
//! custom path. Provider credentials are never read from this file; they
//! come from the environment (see [`ProviderId::credential_env`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::avatar::{
    HttpSettings, ProviderId, StatusPoller, DID_API_BASE_URL, DID_DEFAULT_VOICE,
    HEYGEN_API_BASE_URL, HEYGEN_DEFAULT_VOICE,
};

/// Configuration file structure for avatar-relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub did: DIdConfig,
    #[serde(default)]
    pub heygen: HeyGenConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub poll: PollConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DIdConfig {
    pub base_url: String,
    /// Microsoft/Azure voice used to speak the script.
    pub voice_id: String,
    pub fluent: bool,
    pub pad_audio: f32,
}

impl Default for DIdConfig {
    fn default() -> Self {
        Self {
            base_url: DID_API_BASE_URL.to_string(),
            voice_id: DID_DEFAULT_VOICE.to_string(),
            fluent: true,
            pad_audio: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeyGenConfig {
    pub base_url: String,
    pub voice_id: String,
    pub width: u32,
    pub height: u32,
}

impl Default for HeyGenConfig {
    fn default() -> Self {
        Self {
            base_url: HEYGEN_API_BASE_URL.to_string(),
            voice_id: HEYGEN_DEFAULT_VOICE.to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let defaults = HttpSettings::default();
        Self {
            timeout_secs: defaults.timeout.as_secs(),
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
        }
    }
}

impl HttpConfig {
    pub fn settings(&self) -> HttpSettings {
        HttpSettings {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Provider order when the caller has no preference, e.g. `["D-ID", "HeyGen"]`.
    pub default_order: Vec<ProviderId>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            default_order: ProviderId::DEFAULT_ORDER.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_secs: u64,
    pub max_wait_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        let defaults = StatusPoller::default();
        Self {
            interval_secs: defaults.interval().as_secs(),
            max_wait_secs: defaults.max_wait().as_secs(),
        }
    }
}

impl PollConfig {
    pub fn poller(&self) -> StatusPoller {
        StatusPoller::new(
            Duration::from_secs(self.interval_secs),
            Duration::from_secs(self.max_wait_secs),
        )
    }
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config = Self::parse(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            config
                .validate()
                .map_err(|message| ConfigError::Invalid { path, message })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Check values that parse fine but would make every request or poll misbehave.
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("http.timeout_secs", self.http.timeout_secs),
            ("http.connect_timeout_secs", self.http.connect_timeout_secs),
            ("poll.interval_secs", self.poll.interval_secs),
            ("poll.max_wait_secs", self.poll.max_wait_secs),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(format!("{} must be greater than 0", key));
            }
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid config file '{}': {message}", .path.display())]
    Invalid { path: PathBuf, message: String },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        })
        .join("avatar-relay")
        .join("config.toml")
}

/// Commented default config written by `config init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# avatar-relay configuration
#
# Credentials are read from the environment (or a .env file):
#   DID_API_KEY     D-ID API key
#   HEYGEN_API_KEY  HeyGen API key

[did]
# base_url = "https://api.d-id.com"
# voice_id = "pt-BR-FranciscaNeural"
# fluent = true
# pad_audio = 0.0

[heygen]
# base_url = "https://api.heygen.com"
# voice_id = "pt-BR-female-1"
# width = 1280
# height = 720

[http]
# timeout_secs = 30
# connect_timeout_secs = 10

[orchestrator]
# Providers tried in order when no preference is given
# default_order = ["D-ID", "HeyGen"]

[poll]
# interval_secs = 2
# max_wait_secs = 120
"#;
