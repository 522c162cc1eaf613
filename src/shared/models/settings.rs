use std::{env, fs, path::{Path, PathBuf}, time::Duration};
use serde::Deserialize;
use thiserror::Error;

const SETTINGS_FILENAME: &str = "settings.json";
const API_KEY_ENV: &str = "FAL_KEY";
pub const IMAGE_SUBDIR: &str = "images";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub tcp_socket_binding: String,
    pub tcp_socket_port: u16,
    pub database_path: PathBuf,
    pub public_dir: PathBuf,
    #[serde(default)]
    pub image_service: ImageServiceConfig,
}

/// Connection details for the external image-generation service.
/// Without an `api_key` image acquisition is switched off.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageServiceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://fal.run".to_string()
}

fn default_model() -> String {
    "fal-ai/flux/dev".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ImageServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ImageServiceConfig {
    pub fn generation_url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.model.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse JSON content from file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Settings {
    /// Reads `settings.json` from the working directory, then lets
    /// `FAL_KEY` override the image service credential.
    pub fn load() -> Result<Settings, SettingsError> {
        let mut settings = Settings::load_from(SETTINGS_FILENAME)?;
        settings.apply_api_key_override(env::var(API_KEY_ENV).ok());
        Ok(settings)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_api_key_override(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.image_service.api_key = Some(key);
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.tcp_socket_binding, self.tcp_socket_port)
    }

    pub fn image_dir(&self) -> PathBuf {
        self.public_dir.join(IMAGE_SUBDIR)
    }
}
