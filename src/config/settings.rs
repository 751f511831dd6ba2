//! Configuration settings for bookline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::business::BusinessKind;
use crate::error::{ConfigError, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub defaults: DefaultsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("bookline.toml"),
            dirs::config_dir()
                .map(|p| p.join("bookline/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Config::default())
    }

    fn validate(&self) -> Result<()> {
        if self.backend.url.is_empty() {
            return Err(ConfigError::Invalid("backend.url must not be empty".to_string()).into());
        }
        if self.backend.timeout_secs == 0 {
            return Err(
                ConfigError::Invalid("backend.timeout_secs must be > 0".to_string()).into(),
            );
        }
        if self.defaults.appointment_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "defaults.appointment_minutes must be > 0".to_string(),
            )
            .into());
        }
        Ok(())
    }

    /// Expanded path of the session file.
    pub fn session_file(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.session.file).as_ref())
    }

    /// Expanded path of the offline snapshot file.
    pub fn snapshot_file(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.session.snapshot_file).as_ref())
    }
}

/// Authoritative backend connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the REST API.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5001/api".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Session persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the signed-in user is persisted between CLI runs.
    pub file: String,
    /// Where the offline snapshot store lives.
    pub snapshot_file: String,
    /// Run against demo data instead of the backend.
    pub demo_mode: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: "~/.local/share/bookline/session.json".to_string(),
            snapshot_file: "~/.local/share/bookline/schedule.json".to_string(),
            demo_mode: false,
        }
    }
}

/// Scheduling defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Vertical this deployment serves.
    pub business: BusinessKind,
    /// Fallback appointment duration in minutes.
    pub appointment_minutes: i64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            business: BusinessKind::default(),
            appointment_minutes: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.backend.url, "http://localhost:5001/api");
        assert_eq!(config.defaults.appointment_minutes, 60);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = Config::from_toml(
            r#"
            [backend]
            url = "https://salon.example.com/api"

            [defaults]
            business = "spa"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.url, "https://salon.example.com/api");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.defaults.business, BusinessKind::Spa);
    }

    #[test]
    fn test_validation_rejects_empty_url() {
        let result = Config::from_toml(
            r#"
            [backend]
            url = ""
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let result = Config::from_toml(
            r#"
            [backend]
            timeout_secs = 0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_session_file_tilde_expansion() {
        let config = Config::default();
        let path = config.session_file();
        assert!(!path.to_string_lossy().contains('~'));
    }
}
