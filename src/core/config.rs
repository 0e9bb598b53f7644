//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.canopy/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! Secrets are usually supplied through the environment (or a `.env` file).

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::outbound::DEFAULT_PROMPT_TEMPLATE;
use crate::outbound::providers::openai::{DEFAULT_OPENAI_MODEL, DEFAULT_TEMPERATURE};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CanopyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub map_path: Option<String>,
    pub send_pause_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub prompt_template: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MAP_PATH: &str = "concept_map.json";
pub const DEFAULT_SEND_PAUSE_MS: u64 = 500;

// ============================================================================
// Resolved Config (concrete values, credentials stay optional)
// ============================================================================

#[derive(Clone)]
pub struct ResolvedConfig {
    pub map_path: PathBuf,
    pub send_pause: Duration,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_base_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub prompt_template: String,
}

impl ResolvedConfig {
    /// Chat delivery needs both a bot token and a destination chat.
    pub fn telegram_enabled(&self) -> bool {
        self.telegram_bot_token.is_some() && self.telegram_chat_id.is_some()
    }

    pub fn openai_enabled(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

// Hand-written so credentials never reach the log file.
impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("map_path", &self.map_path)
            .field("send_pause", &self.send_pause)
            .field("telegram_enabled", &self.telegram_enabled())
            .field("telegram_base_url", &self.telegram_base_url)
            .field("openai_enabled", &self.openai_enabled())
            .field("openai_base_url", &self.openai_base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.canopy/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".canopy").join("config.toml"))
}

/// Load config from `~/.canopy/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `CanopyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<CanopyConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(CanopyConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(CanopyConfig::default());
    }

    load_config_from(&path)
}

/// Load config from an explicit path. Missing file is an I/O error.
pub fn load_config_from(path: &Path) -> Result<CanopyConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: CanopyConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!(
        "Config: map_path={:?}, send_pause_ms={:?}, model={:?}",
        config.general.map_path, config.general.send_pause_ms, config.openai.model
    );
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Canopy Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# map_path = "concept_map.json"     # Or pass --map
# send_pause_ms = 500                # Pause between batched chat messages

# [telegram]
# bot_token = "123456:ABC..."        # Or set TELEGRAM_BOT_TOKEN env var
# chat_id = "123456789"              # Or set TELEGRAM_CHAT_ID env var
# base_url = "https://api.telegram.org"

# [openai]
# api_key = "sk-..."                 # Or set OPENAI_API_KEY env var
# base_url = "https://api.openai.com/v1"
# model = "gpt-4.1-mini"             # Or set CANOPY_MODEL env var
# temperature = 0.7
# prompt_template = "Answer briefly. Question: {question}"
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

/// Reads an env var, treating an empty value as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_map` is the `--map` flag (None = not specified).
pub fn resolve(config: &CanopyConfig, cli_map: Option<&Path>) -> ResolvedConfig {
    // Map path: CLI → config → default
    let map_path = cli_map
        .map(Path::to_path_buf)
        .or_else(|| config.general.map_path.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MAP_PATH));

    // Telegram credentials: env → config
    let telegram_bot_token =
        env_var("TELEGRAM_BOT_TOKEN").or_else(|| config.telegram.bot_token.clone());
    let telegram_chat_id =
        env_var("TELEGRAM_CHAT_ID").or_else(|| config.telegram.chat_id.clone());
    let telegram_base_url =
        env_var("TELEGRAM_BASE_URL").or_else(|| config.telegram.base_url.clone());

    // OpenAI: env → config (base URL falls back to the provider default)
    let openai_api_key = env_var("OPENAI_API_KEY").or_else(|| config.openai.api_key.clone());
    let openai_base_url = env_var("OPENAI_BASE_URL").or_else(|| config.openai.base_url.clone());

    // Model: env → config → default
    let model = env_var("CANOPY_MODEL")
        .or_else(|| config.openai.model.clone())
        .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());

    ResolvedConfig {
        map_path,
        send_pause: Duration::from_millis(
            config
                .general
                .send_pause_ms
                .unwrap_or(DEFAULT_SEND_PAUSE_MS),
        ),
        telegram_bot_token,
        telegram_chat_id,
        telegram_base_url,
        openai_api_key,
        openai_base_url,
        model,
        temperature: config.openai.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        prompt_template: config
            .openai
            .prompt_template
            .clone()
            .unwrap_or_else(|| DEFAULT_PROMPT_TEMPLATE.to_string()),
    }
}
