//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.dailytalk/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! The API key is the one setting without a default. It is handed out through
//! `CredentialSource`, and a missing key is fatal before any UI is drawn.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Mode;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DailyTalkConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub mode: Option<Mode>,
    pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

// ============================================================================
// Resolved Config (concrete values, no Options except the secret)
// ============================================================================

#[derive(Clone)]
pub struct ResolvedConfig {
    pub mode: Mode,
    pub model_name: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
}

// Hand-written so the key never lands in the log file.
impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("mode", &self.mode)
            .field("model_name", &self.model_name)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<set>"))
            .field("openai_base_url", &self.openai_base_url)
            .finish()
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// No API key in the environment or the config file.
    MissingCredential(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::MissingCredential(var) => write!(
                f,
                "{var} is missing: set it in the environment, a .env file, or [openai].api_key in the config file"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Credentials
// ============================================================================

/// Supplies the API key once, at client construction.
pub trait CredentialSource {
    fn get_api_key(&self) -> Result<String, ConfigError>;
}

impl CredentialSource for ResolvedConfig {
    fn get_api_key(&self) -> Result<String, ConfigError> {
        match self.openai_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => Err(ConfigError::MissingCredential(API_KEY_ENV)),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.dailytalk/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".dailytalk").join("config.toml"))
}

/// Load config from `~/.dailytalk/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `DailyTalkConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<DailyTalkConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(DailyTalkConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<DailyTalkConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(DailyTalkConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: DailyTalkConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Daily Talk Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# mode = "diary"                     # "diary" or "chat"
# model = "gpt-3.5-turbo"

# [openai]
# api_key = "sk-..."                 # Or set OPENAI_API_KEY env var
# base_url = "https://api.openai.com/v1"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_mode` and `cli_model` are from CLI flags (None = not specified).
pub fn resolve(
    config: &DailyTalkConfig,
    cli_mode: Option<Mode>,
    cli_model: Option<&str>,
) -> ResolvedConfig {
    resolve_with_env(config, cli_mode, cli_model, |name| std::env::var(name).ok())
}

/// Same as `resolve`, reading environment variables through `env`.
pub fn resolve_with_env(
    config: &DailyTalkConfig,
    cli_mode: Option<Mode>,
    cli_model: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Mode: CLI → env → config → default
    let env_mode = env("DAILYTALK_MODE").and_then(|raw| match raw.trim().to_lowercase().as_str() {
        "diary" => Some(Mode::Diary),
        "chat" => Some(Mode::Chat),
        other => {
            warn!("Ignoring unknown DAILYTALK_MODE value: {other}");
            None
        }
    });
    let mode = cli_mode
        .or(env_mode)
        .or(config.general.mode)
        .unwrap_or_default();

    // Model: CLI → env → config → default
    let model_name = cli_model
        .map(str::to_string)
        .or_else(|| env("DAILYTALK_MODEL"))
        .or_else(|| config.general.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    // API key: env → config
    let openai_api_key = env(API_KEY_ENV).or_else(|| config.openai.api_key.clone());

    // Base URL: env → config → default
    let openai_base_url = env("OPENAI_BASE_URL")
        .or_else(|| config.openai.base_url.clone())
        .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

    let resolved = ResolvedConfig {
        mode,
        model_name,
        openai_api_key,
        openai_base_url,
    };
    debug!("Resolved config: {:?}", resolved);
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&DailyTalkConfig::default(), None, None, no_env);
        assert_eq!(resolved.mode, Mode::Diary);
        assert_eq!(resolved.model_name, DEFAULT_MODEL);
        assert_eq!(resolved.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert!(resolved.openai_api_key.is_none());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = DailyTalkConfig {
            general: GeneralConfig {
                mode: Some(Mode::Chat),
                model: Some("gpt-4o-mini".to_string()),
            },
            openai: OpenAiConfig {
                api_key: Some("sk-file".to_string()),
                base_url: Some("http://localhost:1234/v1".to_string()),
            },
        };
        let resolved = resolve_with_env(&config, None, None, no_env);
        assert_eq!(resolved.mode, Mode::Chat);
        assert_eq!(resolved.model_name, "gpt-4o-mini");
        assert_eq!(resolved.openai_api_key.as_deref(), Some("sk-file"));
        assert_eq!(resolved.openai_base_url, "http://localhost:1234/v1");
    }

    #[test]
    fn test_env_overrides_config() {
        let config = DailyTalkConfig {
            general: GeneralConfig {
                mode: Some(Mode::Diary),
                model: Some("from-file".to_string()),
            },
            openai: OpenAiConfig {
                api_key: Some("sk-file".to_string()),
                base_url: None,
            },
        };
        let env = env_of(&[
            ("OPENAI_API_KEY", "sk-env"),
            ("DAILYTALK_MODEL", "from-env"),
            ("DAILYTALK_MODE", "Chat"),
        ]);
        let resolved = resolve_with_env(&config, None, None, env);
        assert_eq!(resolved.openai_api_key.as_deref(), Some("sk-env"));
        assert_eq!(resolved.model_name, "from-env");
        assert_eq!(resolved.mode, Mode::Chat);
    }

    #[test]
    fn test_cli_wins() {
        let env = env_of(&[("DAILYTALK_MODEL", "from-env"), ("DAILYTALK_MODE", "chat")]);
        let resolved = resolve_with_env(
            &DailyTalkConfig::default(),
            Some(Mode::Diary),
            Some("from-cli"),
            env,
        );
        assert_eq!(resolved.mode, Mode::Diary);
        assert_eq!(resolved.model_name, "from-cli");
    }

    #[test]
    fn test_unknown_env_mode_is_ignored() {
        let env = env_of(&[("DAILYTALK_MODE", "calendar")]);
        let resolved = resolve_with_env(&DailyTalkConfig::default(), None, None, env);
        assert_eq!(resolved.mode, Mode::Diary);
    }

    #[test]
    fn test_missing_credential_is_config_error() {
        let resolved = resolve_with_env(&DailyTalkConfig::default(), None, None, no_env);
        assert!(matches!(
            resolved.get_api_key(),
            Err(ConfigError::MissingCredential("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn test_blank_credential_is_missing() {
        let env = env_of(&[("OPENAI_API_KEY", "   ")]);
        let resolved = resolve_with_env(&DailyTalkConfig::default(), None, None, env);
        assert!(matches!(
            resolved.get_api_key(),
            Err(ConfigError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_credential_is_trimmed() {
        let env = env_of(&[("OPENAI_API_KEY", " sk-123\n")]);
        let resolved = resolve_with_env(&DailyTalkConfig::default(), None, None, env);
        assert_eq!(resolved.get_api_key().unwrap(), "sk-123");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let env = env_of(&[("OPENAI_API_KEY", "sk-secret")]);
        let resolved = resolve_with_env(&DailyTalkConfig::default(), None, None, env);
        let rendered = format!("{:?}", resolved);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<set>"));
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
mode = "chat"
model = "gpt-4o-mini"

[openai]
api_key = "sk-test-123"
base_url = "http://192.168.1.100:1234/v1"
"#;
        let config: DailyTalkConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.mode, Some(Mode::Chat));
        assert_eq!(config.general.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-test-123"));
        assert_eq!(
            config.openai.base_url.as_deref(),
            Some("http://192.168.1.100:1234/v1")
        );
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r#"
[general]
model = "my-model"
"#;
        let config: DailyTalkConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.model.as_deref(), Some("my-model"));
        assert!(config.general.mode.is_none());
        assert!(config.openai.api_key.is_none());
    }

    #[test]
    fn test_bad_mode_is_parse_error() {
        let toml_str = r#"
[general]
mode = "calendar"
"#;
        assert!(toml::from_str::<DailyTalkConfig>(toml_str).is_err());
    }

    #[test]
    fn test_missing_file_generates_default() {
        let dir = std::env::temp_dir().join(format!("dailytalk-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = fs::remove_file(&path);

        let config = load_config_from(&path).unwrap();
        assert!(config.general.model.is_none());
        let generated = fs::read_to_string(&path).unwrap();
        assert!(generated.starts_with("# Daily Talk Configuration"));

        // The generated file is all comments, so it parses back to defaults.
        let reloaded = load_config_from(&path).unwrap();
        assert!(reloaded.general.mode.is_none());
        let _ = fs::remove_dir_all(&dir);
    }
}
