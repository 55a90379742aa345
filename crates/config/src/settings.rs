// Client settings
// Loaded from ~/.config/semtui/settings.json, then overridden by environment
// and command-line flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE: &str = "http://localhost:3002/api/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Overrides `api.base`.
pub const ENV_URI: &str = "SEMTUI_URI";
/// Overrides `api.timeoutSecs`.
pub const ENV_TIMEOUT_SECS: &str = "SEMTUI_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend API root, always ending with `/`.
    #[serde(rename = "api.base", alias = "api_base")]
    pub api_base: String,

    /// Per-request timeout.
    #[serde(rename = "api.timeoutSecs", alias = "timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("semtui");
        config_dir.join("settings.json")
    }

    /// Load settings from the default path. A missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. Lines starting with `//` are ignored.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("no settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io { path: path.to_path_buf(), source };

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }

    /// Apply `SEMTUI_URI` / `SEMTUI_TIMEOUT_SECS` from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup(ENV_URI).filter(|v| !v.trim().is_empty()) {
            self.api_base = uri.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            self.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{ENV_TIMEOUT_SECS}={raw} is not a number of seconds")))?;
        }
        Ok(())
    }

    /// Apply command-line overrides.
    pub fn apply_overrides(&mut self, api_base: Option<&str>, timeout_secs: Option<u64>) {
        if let Some(base) = api_base {
            self.api_base = base.trim().to_string();
        }
        if let Some(secs) = timeout_secs {
            self.timeout_secs = secs;
        }
    }

    /// Check the base URL and timeout, normalizing the base to end with `/`.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.api_base)
            .map_err(|e| ConfigError::Invalid(format!("api base '{}': {e}", self.api_base)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "api base '{}' must use http or https",
                self.api_base
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout must be at least one second".into()));
        }
        if !self.api_base.ends_with('/') {
            self.api_base.push('/');
        }
        Ok(())
    }

    /// Defaults, then `file` (or the default path), then environment, then
    /// flags. The result is validated.
    pub fn resolve(
        file: Option<&Path>,
        api_base: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let mut settings = match file {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        settings.apply_env()?;
        settings.apply_overrides(api_base, timeout_secs);
        settings.validate()?;
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the config file path for display
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.api_base, "http://localhost:3002/api/");
        assert_eq!(s.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut s = Settings::default();
        s.apply_env_from(|key| match key {
            ENV_URI => Some("https://semtui.example.org/api".into()),
            ENV_TIMEOUT_SECS => Some(" 15 ".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(s.api_base, "https://semtui.example.org/api");
        assert_eq!(s.timeout_secs, 15);
    }

    #[test]
    fn blank_env_is_ignored() {
        let mut s = Settings::default();
        s.apply_env_from(|_| Some(String::new())).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn bad_timeout_env() {
        let mut s = Settings::default();
        let err = s
            .apply_env_from(|key| (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn flags_win() {
        let mut s = Settings::default();
        s.apply_overrides(Some("http://other:9000/api/"), Some(5));
        assert_eq!(s.api_base, "http://other:9000/api/");
        assert_eq!(s.timeout_secs, 5);
        s.apply_overrides(None, None);
        assert_eq!(s.timeout_secs, 5);
    }

    #[test]
    fn validate_appends_slash() {
        let mut s = Settings { api_base: "http://localhost:3002/api".into(), timeout_secs: 10 };
        s.validate().unwrap();
        assert_eq!(s.api_base, "http://localhost:3002/api/");
    }

    #[test]
    fn validate_rejects_bad_urls() {
        for base in ["not a url", "ftp://host/api/", "localhost:3002"] {
            let mut s = Settings { api_base: base.into(), timeout_secs: 10 };
            assert!(s.validate().is_err(), "{base} should be rejected");
        }
        let mut s = Settings { timeout_secs: 0, ..Settings::default() };
        assert!(s.validate().is_err());
    }
}
