//! Configuration loading and validation.

use crate::error::{ConfigError, Result};
use anyhow::Context as _;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Instructions used when no instruction file exists for the configured persona.
const DEFAULT_INSTRUCTIONS: &str = "You are a helpful, friendly assistant chatting \
    on Discord. Keep answers concise and conversational.";

/// Musebot configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data directory path. Resolved at load time, not read from the file.
    #[serde(skip)]
    pub data_dir: PathBuf,

    /// Discord bot token. The `DISCORD_TOKEN` environment variable wins.
    pub discord_token: Option<String>,

    /// Persona key selecting an instruction file under `instructions/`.
    pub instructions: String,

    /// Maximum turns retained per conversation key.
    pub max_history: usize,

    /// Chat completion backend settings.
    pub chat: ChatConfig,

    /// Engagement behavior settings.
    pub engage: EngageConfig,

    /// Web search context settings.
    pub search: SearchConfig,

    /// Moderation gating settings.
    pub moderation: ModerationConfig,

    /// Presence rotation settings.
    pub presence: PresenceConfig,

    /// Image generation command settings.
    pub imagine: ImagineConfig,

    /// Keep-alive HTTP endpoint settings.
    pub keepalive: KeepaliveConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            discord_token: None,
            instructions: "assistant".into(),
            max_history: 8,
            chat: ChatConfig::default(),
            engage: EngageConfig::default(),
            search: SearchConfig::default(),
            moderation: ModerationConfig::default(),
            presence: PresenceConfig::default(),
            imagine: ImagineConfig::default(),
            keepalive: KeepaliveConfig::default(),
        }
    }
}

/// Chat completion backend configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Backend base URLs, attempted in order on each try.
    pub base_urls: Vec<String>,

    /// Model name sent with each completion request.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_urls: vec!["https://gpt4.gravityengine.cc".into()],
            model: "gpt-3.5-turbo-16k-0613".into(),
            temperature: 0.7,
        }
    }
}

/// Engagement behavior configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngageConfig {
    /// Whether the bot responds to direct messages.
    pub allow_dm: bool,

    /// Whether mention / reply / display-name engagement is enabled.
    pub smart_mention: bool,

    /// Words that trigger engagement by case-sensitive substring match.
    pub trigger_words: Vec<String>,
}

impl Default for EngageConfig {
    fn default() -> Self {
        Self {
            allow_dm: true,
            smart_mention: true,
            trigger_words: Vec::new(),
        }
    }
}

/// Web search context configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Whether search context is gathered at all.
    pub internet_access: bool,

    /// Result count requested from the search API.
    pub max_results: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            internet_access: true,
            max_results: 3,
        }
    }
}

/// Moderation gating configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Whether the NSFW content filter blocks generation requests.
    pub nsfw_filter: bool,

    /// Substrings that block a prompt, matched case-insensitively.
    pub blacklist: Vec<String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            nsfw_filter: true,
            blacklist: Vec::new(),
        }
    }
}

/// Presence rotation configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Status lines cycled through. `{guild_count}` is substituted.
    pub statuses: Vec<String>,

    /// Delay between presence changes, in seconds.
    pub change_delay_secs: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            statuses: vec!["with {guild_count} servers".into()],
            change_delay_secs: 120,
        }
    }
}

/// Image generation command configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ImagineConfig {
    /// Whether 👍 / 👎 reactions are added to generated images.
    pub add_reactions: bool,
}

impl Default for ImagineConfig {
    fn default() -> Self {
        Self {
            add_reactions: true,
        }
    }
}

/// Keep-alive HTTP endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeepaliveConfig {
    /// Whether the endpoint is served at all.
    pub enabled: bool,

    /// Bind address.
    pub bind: String,

    /// Listen port.
    pub port: u16,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

impl Config {
    /// Load configuration from the default location under the data directory.
    pub fn load() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .map(|dir| dir.join("musebot"))
            .unwrap_or_else(|| PathBuf::from("./data"));

        let default_path = data_dir.join("musebot.toml");
        Self::load_inner(data_dir, &default_path, false)
    }

    /// Load from a specific config file path. The file must exist.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let data_dir = path
            .parent()
            .map(Path::to_path_buf)
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."));

        Self::load_inner(data_dir, path, true)
    }

    fn load_inner(data_dir: PathBuf, path: &Path, required: bool) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data directory: {}", data_dir.display()))?;

        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Load {
                path: path.display().to_string(),
                source: Arc::new(source),
            })?;
            toml::from_str::<Config>(&raw).map_err(ConfigError::Parse)?
        } else if required {
            return Err(ConfigError::Load {
                path: path.display().to_string(),
                source: Arc::new(std::io::Error::from(std::io::ErrorKind::NotFound)),
            }
            .into());
        } else {
            Config::default()
        };

        config.data_dir = data_dir;

        if let Ok(token) = std::env::var("DISCORD_TOKEN") {
            config.discord_token = Some(token);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate numeric bounds before any request is composed.
    pub fn validate(&self) -> Result<()> {
        if self.max_history == 0 || self.max_history > 100 {
            return Err(ConfigError::Invalid(format!(
                "max_history must be in 1..=100, got {}",
                self.max_history
            ))
            .into());
        }

        if self.chat.base_urls.is_empty() {
            return Err(ConfigError::Invalid("chat.base_urls must not be empty".into()).into());
        }

        if !(0.0..=2.0).contains(&self.chat.temperature) {
            return Err(ConfigError::Invalid(format!(
                "chat.temperature must be in 0.0..=2.0, got {}",
                self.chat.temperature
            ))
            .into());
        }

        if self.search.max_results == 0 || self.search.max_results > 10 {
            return Err(ConfigError::Invalid(format!(
                "search.max_results must be in 1..=10, got {}",
                self.search.max_results
            ))
            .into());
        }

        if self.presence.change_delay_secs == 0 {
            return Err(
                ConfigError::Invalid("presence.change_delay_secs must be non-zero".into()).into(),
            );
        }

        Ok(())
    }

    /// The Discord token, from the environment or the config file.
    pub fn require_token(&self) -> Result<&str> {
        self.discord_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingKey("discord_token".into()).into())
    }

    /// Path of the flat file persisting the active channel set.
    pub fn channels_path(&self) -> PathBuf {
        self.data_dir.join("channels.txt")
    }

    /// Load the persona instruction text for the configured instruction key.
    ///
    /// Falls back to a built-in default when no instruction file exists.
    pub fn load_instructions(&self) -> String {
        let path = self
            .data_dir
            .join("instructions")
            .join(format!("{}.txt", self.instructions));

        match std::fs::read_to_string(&path) {
            Ok(text) => text.trim().to_string(),
            Err(error) => {
                tracing::debug!(path = %path.display(), %error, "no instruction file, using default");
                DEFAULT_INSTRUCTIONS.to_string()
            }
        }
    }

    /// Display name the assistant turns are tagged with.
    pub fn persona_name(&self) -> String {
        let mut chars = self.instructions.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_max_history_rejected() {
        let config = Config {
            max_history: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_base_urls_rejected() {
        let mut config = Config::default();
        config.chat.base_urls.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_temperature_rejected() {
        let mut config = Config::default();
        config.chat.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_partial_toml() {
        let raw = indoc! {r#"
            max_history = 12

            [engage]
            allow_dm = false
            trigger_words = ["muse"]

            [moderation]
            blacklist = ["forbidden"]
        "#};

        let config: Config = toml::from_str(raw).expect("config should parse");
        assert_eq!(config.max_history, 12);
        assert!(!config.engage.allow_dm);
        assert_eq!(config.engage.trigger_words, vec!["muse".to_string()]);
        assert_eq!(config.moderation.blacklist, vec!["forbidden".to_string()]);
        // Untouched sections keep their defaults.
        assert!(config.moderation.nsfw_filter);
        assert_eq!(config.chat.base_urls.len(), 1);
    }

    #[test]
    fn test_persona_name_capitalized() {
        let config = Config {
            instructions: "assistant".into(),
            ..Config::default()
        };
        assert_eq!(config.persona_name(), "Assistant");
    }
}
