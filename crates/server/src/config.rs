//! Service configuration

use anyhow::Result;
use iris_lib::predictor::DEFAULT_ARTIFACT_PATH;
use serde::Deserialize;
use std::path::PathBuf;

/// Service configuration, read from `IRIS_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Instance name attached to structured log events
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Persisted model artifact; a missing or unreadable file triggers fallback training
    #[serde(default = "default_artifact_path")]
    pub artifact_path: PathBuf,

    /// Directory holding `index.html` and the assets served under `/static`
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "iris-server".to_string())
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8000
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACT_PATH)
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            bind_address: default_bind_address(),
            api_port: default_api_port(),
            artifact_path: default_artifact_path(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from `source` instead of the process environment when given
    pub fn load_from(source: Option<config::Map<String, String>>) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("IRIS")
                    .try_parsing(true)
                    .source(source),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.api_port)
    }

    pub fn index_file(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }
}
