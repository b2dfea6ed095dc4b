//! Runtime settings for the pattern store and completion adapters.
//!
//! Layering, lowest to highest: built-in defaults, the optional TOML file,
//! the plain environment names (`SUPABASE_URL`, `SUPABASE_KEY`,
//! `ANTHROPIC_API_KEY`), then `APP__`-prefixed variables such as
//! `APP__ANTHROPIC__MODEL`.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "console.toml";
const APP_ENV_PREFIX: &str = "APP";
const APP_ENV_SEPARATOR: &str = "__";

/// Plain environment names and the settings keys they populate.
const PLAIN_ENV_KEYS: &[(&str, &str)] = &[
    ("SUPABASE_URL", "supabase.url"),
    ("SUPABASE_KEY", "supabase.api_key"),
    ("ANTHROPIC_API_KEY", "anthropic.api_key"),
];

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub supabase: SupabaseSettings,
    pub anthropic: AnthropicSettings,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SupabaseSettings {
    pub url: String,
    pub api_key: String,
    pub table: String,
    pub request_timeout_secs: u64,
}

impl Default for SupabaseSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: "Patterns".into(),
            request_timeout_secs: 30,
        }
    }
}

impl SupabaseSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AnthropicSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

impl Default for AnthropicSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.anthropic.com".into(),
            model: "claude-3-5-sonnet-20240620".into(),
            max_tokens: 1000,
            temperature: 0.5,
            request_timeout_secs: 120,
        }
    }
}

impl AnthropicSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("supabase", &self.supabase)
            .field("anthropic", &self.anthropic)
            .finish()
    }
}

impl fmt::Debug for SupabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseSettings")
            .field("url", &self.url)
            .field("api_key", &redact(&self.api_key))
            .field("table", &self.table)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl fmt::Debug for AnthropicSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicSettings")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// `<config_dir>/pattern_console/console.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pattern_console").join(CONFIG_FILE_NAME))
}

/// An explicit path wins; otherwise `./console.toml` if present, else the
/// per-user default location.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    default_config_path()
}

pub fn load_settings(config_path: Option<&Path>) -> Result<Settings, ConfigError> {
    build_settings(config_path, std::env::vars().collect())
}

fn app_env_name(key: &str) -> String {
    format!(
        "{APP_ENV_PREFIX}{APP_ENV_SEPARATOR}{}",
        key.replace('.', APP_ENV_SEPARATOR).to_ascii_uppercase()
    )
}

fn build_settings(
    config_path: Option<&Path>,
    env: HashMap<String, String>,
) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(false));
    }

    for (name, key) in PLAIN_ENV_KEYS {
        if env.contains_key(&app_env_name(key)) {
            continue;
        }
        if let Some(value) = env.get(*name).filter(|value| !value.trim().is_empty()) {
            builder = builder.set_override(*key, value.clone())?;
        }
    }

    builder
        .add_source(
            Environment::with_prefix(APP_ENV_PREFIX)
                .prefix_separator(APP_ENV_SEPARATOR)
                .separator(APP_ENV_SEPARATOR)
                .try_parsing(true)
                .source(Some(env)),
        )
        .build()?
        .try_deserialize()
}
