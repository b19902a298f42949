use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Link parser configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub http: HttpConfig,
    pub kodik: KodikConfig,
    pub anilibria: AniLibriaConfig,
    pub sibnet: SibnetConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub connect_timeout_seconds: u64,
    pub timeout_seconds: u64,
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
            connect_timeout_seconds: 10,
            timeout_seconds: 30,
            max_redirects: 10,
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KodikConfig {
    /// Origin the private link endpoint lives on
    pub api_origin: String,
    /// Endpoint used when the player script cannot be searched for a newer one
    pub default_endpoint: String,
}

impl Default for KodikConfig {
    fn default() -> Self {
        Self {
            api_origin: "https://kodik.info".to_string(),
            default_endpoint: "/ftor".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AniLibriaConfig {
    pub api_origin: String,
}

impl Default for AniLibriaConfig {
    fn default() -> Self {
        Self {
            api_origin: "https://anilibria.top".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SibnetConfig {
    pub video_origin: String,
    /// Value sent in the `Host` header of the first video request
    pub video_host: String,
    /// Hops followed from the video host before giving up
    pub max_redirects: usize,
}

impl Default for SibnetConfig {
    fn default() -> Self {
        Self {
            video_origin: "https://video.sibnet.ru".to_string(),
            video_host: "video.sibnet.ru".to_string(),
            max_redirects: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

// ANIXART_PARSER_KODIK__API_ORIGIN, ANIXART_PARSER_HTTP__TIMEOUT_SECONDS, ...
fn environment() -> Environment {
    Environment::with_prefix("ANIXART_PARSER")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl ParserConfig {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self> {
        Self::load_with_env(config_file, environment())
    }

    fn load_with_env(config_file: Option<&str>, env: Environment) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        let config = builder.add_source(env).build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self> {
        Self::load(Some(path))
    }
}
