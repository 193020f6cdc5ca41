//! Zuri configuration.
//!
//! Recognized filename extensions, well-known folder aliases, search
//! tiers and fallback roots are configuration data, not code.
//! Configuration lives in ~/.config/zuri/config.toml (XDG aware) and
//! every field has a default so a missing or partial file still yields
//! a working setup.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Process-wide configuration, read-only at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZuriConfig {
    /// Filename extensions the argument extractor recognizes
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Likely directories, searched in order before any fallback
    #[serde(default = "default_priority_tiers")]
    pub priority_tiers: Vec<PathBuf>,

    /// Roots for the exhaustive full-volume fallback scan
    #[serde(default = "default_fallback_roots")]
    pub fallback_roots: Vec<PathBuf>,

    /// Upper bound for the fallback scan in seconds; 0 means unbounded
    #[serde(default = "default_scan_timeout")]
    pub scan_timeout_secs: u64,

    /// Command history database path (None = default data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_db: Option<PathBuf>,

    /// Well-known folder aliases resolved without any pattern search
    #[serde(default = "default_aliases")]
    pub folder_aliases: BTreeMap<String, PathBuf>,
}

impl Default for ZuriConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            priority_tiers: default_priority_tiers(),
            fallback_roots: default_fallback_roots(),
            scan_timeout_secs: default_scan_timeout(),
            history_db: None,
            folder_aliases: default_aliases(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    [
        "mp3", "mp4", "pdf", "docx", "txt", "png", "jpg", "jpeg", "pptx", "doc", "json", "csv",
        "xlsx",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_aliases() -> BTreeMap<String, PathBuf> {
    let mut aliases = BTreeMap::new();
    let known: [(&str, Option<PathBuf>); 6] = [
        ("music", dirs::audio_dir()),
        ("documents", dirs::document_dir()),
        ("downloads", dirs::download_dir()),
        ("desktop", dirs::desktop_dir()),
        ("pictures", dirs::picture_dir()),
        ("videos", dirs::video_dir()),
    ];
    for (name, dir) in known {
        if let Some(dir) = dir {
            aliases.insert(name.to_string(), dir);
        }
    }
    aliases
}

fn default_priority_tiers() -> Vec<PathBuf> {
    let mut tiers: Vec<PathBuf> = [
        dirs::desktop_dir(),
        dirs::document_dir(),
        dirs::download_dir(),
        dirs::audio_dir(),
        dirs::picture_dir(),
        dirs::video_dir(),
        dirs::home_dir(),
    ]
    .into_iter()
    .flatten()
    .collect();

    // Known cloud-sync folders, when present
    if let Some(home) = dirs::home_dir() {
        for sync in ["OneDrive", "Dropbox"] {
            tiers.push(home.join(sync));
        }
    }
    tiers
}

fn default_fallback_roots() -> Vec<PathBuf> {
    if cfg!(windows) {
        ["C:\\", "D:\\", "E:\\"].iter().map(PathBuf::from).collect()
    } else {
        vec![PathBuf::from("/")]
    }
}

fn default_scan_timeout() -> u64 {
    // Unbounded by default; set a bound to cap the full-volume scan
    0
}

impl ZuriConfig {
    /// Load from the user config file, falling back to defaults.
    pub fn load() -> Self {
        if let Some(path) = Self::user_config_path() {
            if let Ok(content) = std::fs::read_to_string(&path) {
                if let Ok(config) = toml::from_str(&content) {
                    return config;
                }
            }
        }
        Self::default()
    }

    /// Load from an explicit path (CLI override, tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save to the user config file, creating parent directories.
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    pub fn user_config_path() -> Option<PathBuf> {
        let config_dir = if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg)
        } else {
            let home = std::env::var("HOME").ok()?;
            PathBuf::from(home).join(".config")
        };

        Some(config_dir.join("zuri").join("config.toml"))
    }

    /// Default history database path under the user data dir.
    pub fn default_history_db() -> Option<PathBuf> {
        Some(dirs::data_local_dir()?.join("zuri").join("history.db"))
    }
}
