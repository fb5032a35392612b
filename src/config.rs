//! Service configuration.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root (the directory passed as `--root`); stock defaults are the
//! base layer and the user file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! ```text
//! site/                        # Content root (--root)
//! ├── config.toml              # Optional
//! ├── public/                  # Front-end files (index.html, script.js, …)
//! └── images/                  # Image root
//!     ├── daily/
//!     └── history/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! images_dir = "images"        # Image root, relative to the content root
//! public_dir = "public"        # Static front-end files
//!
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//! trust_proxy = true           # Use X-Forwarded-Proto for link protocol
//!
//! [share]
//! title = "Gallery Image"
//! description = "Check out this image from the gallery."
//! card = "summary_large_image" # twitter:card
//! og_type = "website"          # og:type
//!
//! [logging]
//! filter = "info"              # RUST_LOG takes precedence
//! json = false
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

const TWITTER_CARDS: &[&str] = &["summary", "summary_large_image", "app", "player"];

/// Service configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Image root, relative to the content root. Also the URL prefix images
    /// are served under.
    pub images_dir: String,
    /// Directory of static front-end files, relative to the content root.
    pub public_dir: String,
    pub server: ServerConfig,
    pub share: ShareConfig,
    pub logging: LoggingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            images_dir: "images".to_string(),
            public_dir: "public".to_string(),
            server: ServerConfig::default(),
            share: ShareConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_relative_dir("images_dir", &self.images_dir)?;
        validate_relative_dir("public_dir", &self.public_dir)?;
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server.host must not be empty".into(),
            ));
        }
        if self.share.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "share.title must not be empty".into(),
            ));
        }
        if !TWITTER_CARDS.contains(&self.share.card.as_str()) {
            return Err(ConfigError::Validation(format!(
                "share.card must be one of {}",
                TWITTER_CARDS.join(", ")
            )));
        }
        Ok(())
    }
}

/// A directory setting must stay inside the content root.
fn validate_relative_dir(key: &str, value: &str) -> Result<(), ConfigError> {
    let path = Path::new(value);
    let only_normal = path.components().all(|c| matches!(c, Component::Normal(_)));
    if value.is_empty() || !only_normal {
        return Err(ConfigError::Validation(format!(
            "{key} must be a relative path without '.' or '..' segments"
        )));
    }
    Ok(())
}

/// Listener and proxy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Trust `X-Forwarded-Proto` from a reverse proxy.
    pub trust_proxy: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            trust_proxy: true,
        }
    }
}

/// Fixed social-preview text for share pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShareConfig {
    /// `og:title` and the page `<title>`.
    pub title: String,
    /// `og:description`.
    pub description: String,
    /// `twitter:card`.
    pub card: String,
    /// `og:type`.
    pub og_type: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            title: "Gallery Image".to_string(),
            description: "Check out this image from the gallery.".to_string(),
            card: "summary_large_image".to_string(),
            og_type: "website".to_string(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|err| ConfigError::Validation(format!("default config must serialize: {err}")))
}

/// Lay the user's `config.toml` over the stock defaults.
///
/// Tables merge key by key so `[server] port = 8080` keeps the default host;
/// any other value, arrays included, replaces the default outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut defaults), toml::Value::Table(user)) => {
            for (key, value) in user {
                let merged = match defaults.remove(&key) {
                    Some(default) => merge_toml(default, value),
                    None => value,
                };
                defaults.insert(key, merged);
            }
            toml::Value::Table(defaults)
        }
        (_, user) => user,
    }
}

/// The content root's `config.toml` as raw TOML, or `None` when there is none.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let content = match fs::read_to_string(root.join("config.toml")) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(toml::from_str(&content)?))
}

/// Defaults plus the optional user file, deserialized strictly and validated.
pub fn resolve_config(
    defaults: toml::Value,
    user: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = user.into_iter().fold(defaults, merge_toml);
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Stock defaults with `{root}/config.toml` on top. There is one layer only:
/// nothing below the content root is consulted.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# gallery-share configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Place this file in the content root (the directory given to --root).
# Unknown keys will cause an error.

# Image root, relative to the content root. Must contain daily/ and/or
# history/ collections. Images are served under /<images_dir>/.
images_dir = "images"

# Static front-end files (index.html, script, styles), served at /.
public_dir = "public"

# ---------------------------------------------------------------------------
# HTTP server
# ---------------------------------------------------------------------------
[server]
host = "0.0.0.0"
port = 3000

# Honour X-Forwarded-Proto when building share links. Enable when running
# behind a TLS-terminating reverse proxy.
trust_proxy = true

# ---------------------------------------------------------------------------
# Share page social preview
# ---------------------------------------------------------------------------
[share]
title = "Gallery Image"
description = "Check out this image from the gallery."

# twitter:card - one of summary, summary_large_image, app, player
card = "summary_large_image"

# og:type
og_type = "website"

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# tracing filter directive; the RUST_LOG environment variable wins.
filter = "info"

# JSON lines instead of plain text.
json = false
"##
}
