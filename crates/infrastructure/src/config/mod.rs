//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//!
//! Provider settings live next to their clients (`ai_speech::SpeechConfig`,
//! `ai_core::InferenceConfig`) and are nested here under `speech` and
//! `inference`.

mod server;

use std::{fmt, path::Path};

use ai_core::InferenceConfig;
use ai_speech::SpeechConfig;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use server::ServerConfig;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "ALLOWANCE";

/// Conventional variable holding the ElevenLabs credential
pub const ELEVENLABS_API_KEY_VAR: &str = "ELEVENLABS_API_KEY";

/// Conventional variable holding the Gemini credential
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Production environment
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Environment,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// ElevenLabs text-to-speech settings
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Gemini text generation settings
    #[serde(default)]
    pub inference: InferenceConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and the environment
    ///
    /// Precedence, lowest first: built-in defaults, `config.toml` in the
    /// working directory, `ALLOWANCE_*` variables (`__` separates nested
    /// keys, e.g. `ALLOWANCE_SERVER__PORT`). Credentials still missing after
    /// that are taken from `ELEVENLABS_API_KEY` / `GEMINI_API_KEY`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut config = Self::layered(
            config::File::with_name("config").required(false),
            Some(Self::env_source()),
        )?;
        config.resolve_env_secrets(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from an explicit file only
    ///
    /// Unlike [`AppConfig::load`] the file is required, and neither
    /// `ALLOWANCE_*` nor the conventional provider variables are consulted,
    /// so the result depends on the file alone.
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        debug!(path = %path.display(), "Loading configuration file");
        Self::layered(config::File::from(path).required(true), None)
    }

    /// Defaults, then `file`, then `env` when given
    fn layered<S>(file: S, env: Option<config::Environment>) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let mut builder = Self::defaults()?.add_source(file);
        if let Some(env) = env {
            builder = builder.add_source(env);
        }
        builder.build()?.try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)
    }

    fn env_source() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Fill empty provider credentials from the conventional variables
    ///
    /// Existing values from `config.toml` or `ALLOWANCE_*` are never
    /// overridden. `lookup` returns the value of a variable, if set.
    pub fn resolve_env_secrets<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if !self.speech.has_api_key() {
            self.speech.api_key = non_blank(ELEVENLABS_API_KEY_VAR).map(|key| {
                info!(var = ELEVENLABS_API_KEY_VAR, "Using ElevenLabs key from environment");
                SecretString::from(key)
            });
        }

        if !self.inference.is_configured() {
            self.inference.api_key = non_blank(GEMINI_API_KEY_VAR).map(|key| {
                info!(var = GEMINI_API_KEY_VAR, "Using Gemini key from environment");
                SecretString::from(key)
            });
        }
    }

    /// Validate every section
    ///
    /// Missing credentials are not an error; they are reported by the
    /// adapters at startup instead.
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.speech
            .validate()
            .map_err(|e| format!("speech: {e}"))?;
        self.inference
            .validate()
            .map_err(|e| format!("inference: {e}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    // ============ Environment Tests ============

    #[test]
    fn environment_default_is_development() {
        assert_eq!(Environment::default(), Environment::Development);
    }

    #[test]
    fn environment_display() {
        assert_eq!(format!("{}", Environment::Development), "development");
        assert_eq!(format!("{}", Environment::Production), "production");
    }

    #[test]
    fn environment_from_str() {
        assert_eq!(
            "dev".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert_eq!(
            "PRODUCTION".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    // ============ AppConfig Tests ============

    #[test]
    fn default_config_is_valid_without_credentials() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.speech.has_api_key());
        assert!(!config.inference.is_configured());
    }

    #[test]
    fn toml_sections_deserialize() {
        let config: AppConfig = toml::from_str(
            r#"
            environment = "production"

            [server]
            port = 9100

            [speech]
            api_key = "el-key"
            default_voice = "custom-voice"

            [inference]
            default_model = "gemini-1.5-flash"
            "#,
        )
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.speech.api_key_str(), Some("el-key"));
        assert_eq!(config.speech.default_voice, "custom-voice");
        assert_eq!(config.inference.default_model, "gemini-1.5-flash");
    }

    #[test]
    fn serialization_skips_credentials() {
        let config = AppConfig {
            speech: SpeechConfig::default().with_api_key("el-secret"),
            inference: InferenceConfig::default().with_api_key("gm-secret"),
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("el-secret"));
        assert!(!json.contains("gm-secret"));
    }

    #[test]
    fn debug_redacts_credentials() {
        let config = AppConfig {
            inference: InferenceConfig::default().with_api_key("gm-secret"),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("gm-secret"));
    }

    // ============ Secret Resolution Tests ============

    #[test]
    fn env_secrets_fill_missing_keys() {
        let env = env_of(&[
            (ELEVENLABS_API_KEY_VAR, "el-env"),
            (GEMINI_API_KEY_VAR, "gm-env"),
        ]);
        let mut config = AppConfig::default();

        config.resolve_env_secrets(|name| env.get(name).cloned());

        assert_eq!(config.speech.api_key_str(), Some("el-env"));
        assert_eq!(config.inference.api_key_str(), Some("gm-env"));
    }

    #[test]
    fn env_secrets_never_override_configured_keys() {
        let env = env_of(&[(GEMINI_API_KEY_VAR, "gm-env")]);
        let mut config = AppConfig {
            inference: InferenceConfig::default().with_api_key("gm-file"),
            ..Default::default()
        };

        config.resolve_env_secrets(|name| env.get(name).cloned());

        assert_eq!(config.inference.api_key_str(), Some("gm-file"));
        assert!(!config.speech.has_api_key());
    }

    #[test]
    fn blank_env_secrets_are_ignored() {
        let env = env_of(&[(ELEVENLABS_API_KEY_VAR, "   ")]);
        let mut config = AppConfig::default();

        config.resolve_env_secrets(|name| env.get(name).cloned());

        assert!(!config.speech.has_api_key());
    }

    // ============ File Loading Tests ============

    #[test]
    fn load_from_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [server]
            port = 8123
            log_format = "json"

            [inference]
            api_key = "from-file"
            timeout_ms = 2500
            "#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();

        assert_eq!(config.server.port, 8123);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.log_format, "json");
        assert_eq!(config.inference.api_key_str(), Some("from-file"));
        assert_eq!(config.inference.timeout_ms, 2500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_layer_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 8123\n").unwrap();

        let vars: config::Map<String, String> =
            [("ALLOWANCE_SERVER__PORT".to_string(), "9000".to_string())]
                .into_iter()
                .collect();
        let env = AppConfig::env_source().source(Some(vars));

        let layered =
            AppConfig::layered(config::File::from(path.as_path()).required(true), Some(env))
                .unwrap();
        assert_eq!(layered.server.port, 9000);

        let file_only = AppConfig::load_from(&path).unwrap();
        assert_eq!(file_only.server.port, 8123);
    }

    #[test]
    fn load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load_from(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn validate_reports_section() {
        let mut config = AppConfig::default();
        config.inference.temperature = 5.0;
        assert!(config.validate().unwrap_err().starts_with("inference:"));
    }
}
