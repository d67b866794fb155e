use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use engine_logging::engine_info;
use extractor_engine::ClientSettings;
use serde::{Deserialize, Serialize};

/// Client settings read from an optional RON file.
///
/// Every field has a default, so a file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: String,
    pub poll_interval_ms: u64,
    pub download_dir: PathBuf,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub download_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let settings = ClientSettings::default();
        Self {
            server: settings.base_url,
            poll_interval_ms: 2000,
            download_dir: PathBuf::from("downloads"),
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
            download_timeout_secs: settings.download_timeout.as_secs(),
        }
    }
}

/// Command-line values that win over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub server: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub poll_interval_ms: Option<u64>,
}

impl ClientConfig {
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(server) = overrides.server {
            self.server = server;
        }
        if let Some(dir) = overrides.download_dir {
            self.download_dir = dir;
        }
        if let Some(interval) = overrides.poll_interval_ms {
            self.poll_interval_ms = interval;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval_ms == 0 {
            bail!("poll interval must be at least 1 ms");
        }
        if self.server.trim().is_empty() {
            bail!("server URL must not be empty");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.server.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            download_timeout: Duration::from_secs(self.download_timeout_secs),
        }
    }
}

/// Load the config file, or defaults when no path was given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ClientConfig> {
    let Some(path) = path else {
        return Ok(ClientConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: ClientConfig = ron::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;
    engine_info!("Loaded config from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.server, "http://127.0.0.1:5001");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("extractor.ron");
        fs::write(
            &path,
            r#"(server: "http://media.local:8080", poll_interval_ms: 500)"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server, "http://media.local:8080");
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.download_dir, PathBuf::from("downloads"));
    }

    #[test]
    fn unreadable_or_malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(load_config(Some(&temp.path().join("missing.ron"))).is_err());

        let path = temp.path().join("bad.ron");
        fs::write(&path, "(server: 42").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn overrides_win_and_zero_interval_is_rejected() {
        let mut config = ClientConfig::default();
        config.apply(ConfigOverrides {
            server: Some("http://other:1".to_string()),
            download_dir: None,
            poll_interval_ms: Some(0),
        });

        assert_eq!(config.server, "http://other:1");
        assert_eq!(config.download_dir, PathBuf::from("downloads"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn settings_carry_timeouts() {
        let config = ClientConfig {
            request_timeout_secs: 5,
            ..ClientConfig::default()
        };
        let settings = config.client_settings();
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.base_url, config.server);
    }
}
