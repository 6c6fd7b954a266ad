use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::resolver::{TimeFormat, TimezoneDisplayMode};

/// Key used against a local development server when none is configured.
pub const DEVELOPMENT_API_KEY: &str = "dev-key-for-local-testing";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub network: NetworkConfig,
    pub orchestrator: OrchestratorConfig,
    pub display: DisplayConfig,
}

/// Deployment the client talks to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ApiEnvironment {
    pub fn default_base_url(self) -> &'static str {
        match self {
            ApiEnvironment::Development => "http://localhost:8080",
            ApiEnvironment::Staging => "https://staging.api.magizh.me",
            ApiEnvironment::Production => "https://api.magizh.me",
        }
    }

    /// Only development tolerates a missing key.
    pub fn requires_api_key(self) -> bool {
        self != ApiEnvironment::Development
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Overrides the environment's default base URL.
    pub base_url: Option<String>,
    pub environment: ApiEnvironment,
    pub api_key: Option<String>,
    pub client_type: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            environment: ApiEnvironment::Development,
            api_key: None,
            client_type: "cli".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.default_base_url())
            .trim_end_matches('/')
    }

    /// The key to send, if any. `None` outside development means the
    /// credential is missing.
    pub fn credential(&self) -> Option<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Some(key),
            _ if !self.environment.requires_api_key() => Some(DEVELOPMENT_API_KEY),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 15,
            connect_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OrchestratorConfig {
    /// Quiet period that collapses rapid date changes into one fetch.
    pub debounce_ms: u64,
    /// Pause before fallback data is installed.
    pub fallback_delay_ms: u64,
    /// Upper bound on one remote fetch, whatever the source does.
    pub fetch_timeout_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            fallback_delay_ms: 200,
            fetch_timeout_ms: 20_000,
        }
    }
}

impl OrchestratorConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DisplayConfig {
    pub time_format: TimeFormat,
    pub timezone_display: TimezoneDisplayMode,
    pub vegetarian: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        // Load .env file (silently ignore if not present)
        let _ = dotenvy::dotenv();

        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("magizh");

        let builder = Config::builder()
            // 1. Defaults
            .set_default("api.base_url", None::<String>)?
            .set_default("api.environment", "development")?
            .set_default("api.api_key", None::<String>)?
            .set_default("api.client_type", "cli")?
            .set_default("network.request_timeout_secs", 15)?
            .set_default("network.connect_timeout_secs", 5)?
            .set_default("orchestrator.debounce_ms", 300)?
            .set_default("orchestrator.fallback_delay_ms", 200)?
            .set_default("orchestrator.fetch_timeout_ms", 20_000)?
            .set_default("display.time_format", "12h")?
            .set_default("display.timezone_display", "original")?
            .set_default("display.vegetarian", false)?
            // 2. Local config file (optional)
            .add_source(File::from(PathBuf::from("config.toml")).required(false))
            // 3. User config directory (optional, overrides local)
            .add_source(File::from(config_dir.join("config.toml")).required(false))
            // 4. Environment variables (MAGIZH__NETWORK__REQUEST_TIMEOUT_SECS=...)
            .add_source(Environment::with_prefix("MAGIZH").separator("__"));

        let s = builder.build()?;
        Ok(s.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Default Value Tests ====================

    #[test]
    fn test_network_config_defaults() {
        let config = NetworkConfig::default();
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.connect_timeout_secs, 5);
    }

    #[test]
    fn test_orchestrator_config_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.fallback_delay(), Duration::from_millis(200));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_display_config_defaults() {
        let config = DisplayConfig::default();
        assert_eq!(config.time_format, TimeFormat::TwelveHour);
        assert_eq!(config.timezone_display, TimezoneDisplayMode::Original);
        assert!(!config.vegetarian);
    }

    // ==================== Environment Tests ====================

    #[test]
    fn test_base_url_per_environment() {
        let mut api = ApiConfig::default();
        assert_eq!(api.resolved_base_url(), "http://localhost:8080");

        api.environment = ApiEnvironment::Production;
        assert_eq!(api.resolved_base_url(), "https://api.magizh.me");

        api.base_url = Some("http://127.0.0.1:9000/".to_string());
        assert_eq!(api.resolved_base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_missing_key_tolerated_in_development() {
        let api = ApiConfig::default();
        assert_eq!(api.credential(), Some(DEVELOPMENT_API_KEY));
    }

    #[test]
    fn test_missing_key_is_none_in_production() {
        let api = ApiConfig {
            environment: ApiEnvironment::Production,
            ..ApiConfig::default()
        };
        assert_eq!(api.credential(), None);

        let blank = ApiConfig {
            api_key: Some("  ".to_string()),
            ..api
        };
        assert_eq!(blank.credential(), None);
    }

    #[test]
    fn test_configured_key_wins() {
        let api = ApiConfig {
            environment: ApiEnvironment::Staging,
            api_key: Some("secret".to_string()),
            ..ApiConfig::default()
        };
        assert_eq!(api.credential(), Some("secret"));
    }

    // ==================== Config Loading Tests ====================

    #[test]
    fn test_config_load_with_defaults() {
        let result = AppConfig::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_loaded_config_has_expected_structure() {
        let config = AppConfig::load().expect("Config should load");

        assert!(!config.api.client_type.is_empty());
        assert!(config.network.request_timeout_secs > 0);
        assert!(config.orchestrator.debounce_ms > 0);
    }

    // ==================== Environment Variable Override Tests ====================

    /// Helper to safely set and remove environment variables in tests.
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        // SAFETY: Test environment, keys are unique per test
        unsafe {
            std::env::set_var(key, value);
        }
        let result = f();
        unsafe {
            std::env::remove_var(key);
        }
        result
    }

    #[test]
    fn test_env_var_overrides_network_timeout() {
        let config = with_env_var("MAGIZH__NETWORK__CONNECT_TIMEOUT_SECS", "42", || {
            AppConfig::load().expect("Config should load")
        });

        assert_eq!(
            config.network.connect_timeout_secs, 42,
            "Environment variable should override network.connect_timeout_secs"
        );
    }

    #[test]
    fn test_env_var_overrides_client_type() {
        let config = with_env_var("MAGIZH__API__CLIENT_TYPE", "ios", || {
            AppConfig::load().expect("Config should load")
        });

        assert_eq!(config.api.client_type, "ios");
    }

    #[test]
    fn test_env_var_overrides_display() {
        let config = with_env_var("MAGIZH__DISPLAY__TIME_FORMAT", "24h", || {
            AppConfig::load().expect("Config should load")
        });

        assert_eq!(config.display.time_format, TimeFormat::TwentyFourHour);
    }
}
