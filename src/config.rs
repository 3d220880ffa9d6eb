//! Configuration management for postergrid
//!
//! Config is stored at ~/.config/postergrid/config.toml. Values are layered:
//! file, then environment, then command-line flags.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::gallery::{PresentationMode, SizeClass};
use crate::store::MetadataStore;

/// Media server used when nothing else is configured
pub const DEFAULT_SERVER: &str = "http://localhost:32400";

pub const ENV_SERVER: &str = "POSTERGRID_SERVER";
pub const ENV_PLEX_TOKEN: &str = "PLEX_TOKEN";
pub const ENV_YOUTUBE_KEY: &str = "YOUTUBE_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Plex server base URL
    pub server_url: Option<String>,
    /// X-Plex-Token sent with every request
    pub plex_token: Option<String>,
    /// YouTube Data API key; trailer search is off without one
    pub youtube_api_key: Option<String>,
    /// Screen-size bucket for cell sizing
    pub size_class: Option<SizeClass>,
    /// Presentation used when browsing starts
    pub presentation: Option<PresentationMode>,
    /// Location of the local trailer database
    pub metadata_db: Option<PathBuf>,
}

impl Config {
    /// Get config file path (~/.config/postergrid/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("postergrid").join("config.toml"))
    }

    /// Load config from the default location, or defaults if missing
    pub fn load() -> Self {
        Self::path().map(|p| Self::load_from(&p)).unwrap_or_default()
    }

    /// Load config from `path`; unreadable or invalid files yield defaults
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Apply `POSTERGRID_SERVER`, `PLEX_TOKEN` and `YOUTUBE_API_KEY`
    pub fn with_env_overrides(self) -> Self {
        self.overlay(|name| std::env::var(name).ok())
    }

    fn overlay<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(server) = var(ENV_SERVER) {
            self.server_url = Some(server);
        }
        if let Some(token) = var(ENV_PLEX_TOKEN) {
            self.plex_token = Some(token);
        }
        if let Some(key) = var(ENV_YOUTUBE_KEY) {
            self.youtube_api_key = Some(key);
        }
        self
    }

    /// Apply `--server` / `--token`
    pub fn with_flags(mut self, server: Option<String>, token: Option<String>) -> Self {
        if server.is_some() {
            self.server_url = server;
        }
        if token.is_some() {
            self.plex_token = token;
        }
        self
    }

    pub fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER)
    }

    pub fn size_class(&self) -> SizeClass {
        self.size_class.unwrap_or_default()
    }

    pub fn presentation(&self) -> PresentationMode {
        self.presentation.unwrap_or_default()
    }

    /// Trailer database path: configured, else the data directory
    pub fn metadata_db_path(&self) -> Option<PathBuf> {
        self.metadata_db.clone().or_else(MetadataStore::default_path)
    }
}
