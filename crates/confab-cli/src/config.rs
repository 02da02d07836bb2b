use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfabConfig {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub user: UserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_max_agents")]
    pub max_agents: usize,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: u64,
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
}

fn default_max_agents() -> usize {
    3
}
fn default_initial_delay_ms() -> u64 {
    1000
}
fn default_stagger_ms() -> u64 {
    1500
}
fn default_max_pending() -> usize {
    64
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_agents: default_max_agents(),
            initial_delay_ms: default_initial_delay_ms(),
            stagger_ms: default_stagger_ms(),
            max_pending: default_max_pending(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_user_name")]
    pub name: String,
    #[serde(default = "default_user_avatar")]
    pub avatar: String,
}

fn default_user_name() -> String {
    "当前用户".to_string()
}

fn default_user_avatar() -> String {
    "User".to_string()
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            name: default_user_name(),
            avatar: default_user_avatar(),
        }
    }
}

pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".confab")
}

impl ConfabConfig {
    pub fn load(custom_path: &Option<PathBuf>) -> Result<Self> {
        let path = custom_path
            .clone()
            .unwrap_or_else(|| config_dir().join("config.toml"));

        let content = std::fs::read_to_string(&path).with_context(|| {
            format!(
                "Failed to read config at {}. Run `confab init` first.",
                path.display()
            )
        })?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;

        Ok(config)
    }

    /// Load the config file, falling back to defaults when no file exists.
    /// An explicitly given path must load; only the default location may be
    /// silently absent.
    pub fn load_or_default(custom_path: &Option<PathBuf>) -> Result<Self> {
        if custom_path.is_some() {
            return Self::load(custom_path);
        }
        let path = config_dir().join("config.toml");
        if path.exists() {
            Self::load(&None)
        } else {
            Ok(Self::default())
        }
    }
}
