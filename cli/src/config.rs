// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;

use tokio::fs;

use notisync_notion::NotionConfig;

const CONFIG_ENV: &str = "NOTISYNC_CONFIG";
const TOKEN_ENV: &str = "NOTION_TOKEN";

/// Resolves and parses the configuration file.
///
/// Resolution order: the `--config` flag, then the `NOTISYNC_CONFIG`
/// environment variable, then `notisync/config.toml` under the user config
/// directory.
#[tracing::instrument]
pub async fn parse_config(path: Option<PathBuf>) -> Result<Config, Box<dyn Error>> {
    let path = if let Some(path) = path {
        path
    } else if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        PathBuf::from(env_path)
    } else {
        let config = get_config_dir()?.join("notisync/config.toml");
        if !config.exists() {
            return Err(format!("No config found at: {}", config.display()).into());
        }
        config
    };

    let mut config = fs::read_to_string(&path)
        .await
        .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
        .parse::<Config>()?;

    // An environment token takes precedence so the file can omit secrets.
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        config.notion.token = token;
    }
    if config.notion.token.trim().is_empty() {
        return Err(format!(
            "No Notion token: set `token` under [notion] in {} or the {TOKEN_ENV} environment variable",
            path.display()
        )
        .into());
    }

    Ok(config)
}

/// The `config.toml` contents.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Path of the local JSON store.
    pub data_path: PathBuf,

    /// Id of the Notion page new databases are created under.
    #[serde(default)]
    pub parent_page_id: Option<String>,

    /// The events database id, once known.
    #[serde(default)]
    pub events_db_id: Option<String>,

    /// The tasks database id, once known.
    #[serde(default)]
    pub tasks_db_id: Option<String>,

    /// Seconds between runs in watch mode.
    #[serde(default = "default_watch_interval")]
    pub watch_interval_secs: u64,

    /// Notion API settings, including the integration token.
    #[serde(default)]
    pub notion: NotionConfig,
}

fn default_watch_interval() -> u64 {
    300
}

impl FromStr for Config {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    dirs::config_dir().ok_or_else(|| "User-specific config directory not found".into())
}
