// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

/// Notion API connection configuration.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NotionConfig {
    /// Integration token, sent as a bearer credential.
    pub token: String,

    /// API version header value.
    #[serde(default = "default_version")]
    pub notion_version: String,

    /// Base URL of the versioned API. Overridable for tests.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_version() -> String {
    "2022-06-28".to_string()
}

fn default_base_url() -> String {
    "https://api.notion.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("notisync/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            notion_version: default_version(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}
