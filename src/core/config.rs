//! Application configuration management

use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::workspace::ViewMode;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Editor settings
    pub editor: EditorConfig,
    /// Layout settings
    pub layout: LayoutConfig,
    /// Print export settings
    pub export: ExportConfig,
    /// Override for the document store file
    pub storage_path: Option<PathBuf>,
}

/// Editor-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Font size in pixels
    pub font_size: f32,
    /// Show line numbers
    pub show_line_numbers: bool,
    /// Word wrap
    pub word_wrap: bool,
}

/// Layout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Editor share of the split view
    pub split_ratio: f32,
    /// View mode on startup
    pub default_view: ViewMode,
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Delay between switching to preview and snapshotting it
    pub render_delay_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            show_line_numbers: true,
            word_wrap: true,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            split_ratio: 0.5,
            default_view: ViewMode::Split,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            render_delay_ms: 500,
        }
    }
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "cerberus", "Cerberus")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::load_from(&path)
    }

    /// Load configuration from `path`; a missing file gives the defaults
    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&path)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Location of the document store
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.data_dir().join("storage.json"))
                .unwrap_or_else(|| PathBuf::from("storage.json"))
        })
    }
}
