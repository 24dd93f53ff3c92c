use anyhow::{Context, Result};
use memory_sidebar_core::view::EXCERPT_CHARS;
use memory_sidebar_core::{AnnotationType, Expansion, ViewOptions};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub sidebar: SidebarConfig,
    #[serde(default)]
    pub auth: Option<AuthConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SidebarConfig {
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
    /// Groups expanded on first render, by wire name.
    #[serde(default = "default_expanded")]
    pub expanded: Vec<String>,
    /// Visible terminal rows used when centering a scrolled-to card.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: usize,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            excerpt_chars: default_excerpt_chars(),
            expanded: default_expanded(),
            viewport_height: default_viewport_height(),
        }
    }
}

fn default_excerpt_chars() -> usize {
    EXCERPT_CHARS
}
fn default_expanded() -> Vec<String> {
    vec![
        "hook".to_string(),
        "foreshadow".to_string(),
        "plot_point".to_string(),
    ]
}
fn default_viewport_height() -> usize {
    24
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Endpoint that returns the current user when the session is valid.
    pub verify_url: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
}

fn default_login_path() -> String {
    "/login".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_keepalive_secs() -> u64 {
    300
}

impl SidebarConfig {
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            excerpt_chars: self.excerpt_chars,
        }
    }

    /// Initial expansion. Names are checked by [`load_config`].
    pub fn expansion(&self) -> Expansion {
        Expansion::only(
            self.expanded
                .iter()
                .filter_map(|name| AnnotationType::parse(name)),
        )
    }
}

impl Config {
    /// Defaults used when no config file is present.
    pub fn minimal() -> Self {
        Self {
            sidebar: SidebarConfig::default(),
            auth: None,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`Config::minimal`].
pub fn load_or_minimal(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::minimal())
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.sidebar.excerpt_chars == 0 {
        anyhow::bail!("sidebar.excerpt_chars must be > 0");
    }

    if config.sidebar.viewport_height == 0 {
        anyhow::bail!("sidebar.viewport_height must be > 0");
    }

    for name in &config.sidebar.expanded {
        if AnnotationType::parse(name).is_none() {
            anyhow::bail!(
                "Unknown annotation type in sidebar.expanded: '{}'. Must be hook, foreshadow, plot_point, or character_event.",
                name
            );
        }
    }

    if let Some(auth) = &config.auth {
        if auth.verify_url.trim().is_empty() {
            anyhow::bail!("auth.verify_url must not be empty");
        }
        if !auth.login_path.starts_with('/') {
            anyhow::bail!("auth.login_path must start with '/'");
        }
        if auth.keepalive_secs == 0 {
            anyhow::bail!("auth.keepalive_secs must be > 0");
        }
    }

    Ok(())
}
