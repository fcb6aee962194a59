//! Light/dark/system theme preference

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::storage::{Storage, THEME_KEY};

/// User-selected theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

/// Concrete theme after resolving `System`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl ThemePreference {
    pub const ALL: [ThemePreference; 3] = [Self::Light, Self::Dark, Self::System];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::System => "System",
        }
    }

    /// Resolve against the platform preference, sampled by the caller
    pub fn resolve(self, system: Option<ResolvedTheme>) -> ResolvedTheme {
        match self {
            Self::Light => ResolvedTheme::Light,
            Self::Dark => ResolvedTheme::Dark,
            Self::System => system.unwrap_or(ResolvedTheme::Light),
        }
    }

    /// Header button behaviour: dark goes to light, anything else to dark
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Read the stored preference, defaulting to `System`
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.load_text(THEME_KEY) {
            Some(value) => value.parse().unwrap_or_else(|_| {
                tracing::warn!("Unknown stored theme {:?}, using system", value);
                Self::System
            }),
            None => Self::System,
        }
    }

    pub fn persist(self, storage: &mut dyn Storage) {
        if let Err(e) = storage.save_text(THEME_KEY, self.as_str()) {
            tracing::error!("Failed to persist theme: {}", e);
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognised theme names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme: {0}")]
pub struct UnknownTheme(pub String);

impl FromStr for ThemePreference {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

impl ResolvedTheme {
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    pub fn from_egui(theme: egui::Theme) -> Self {
        match theme {
            egui::Theme::Dark => Self::Dark,
            egui::Theme::Light => Self::Light,
        }
    }

    pub fn to_egui(self) -> egui::Theme {
        match self {
            Self::Dark => egui::Theme::Dark,
            Self::Light => egui::Theme::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStorage;

    #[test]
    fn test_default_is_system() {
        let storage = MemoryStorage::new();
        assert_eq!(ThemePreference::load(&storage), ThemePreference::System);
    }

    #[test]
    fn test_dark_survives_reload() {
        let mut storage = MemoryStorage::new();
        let theme = ThemePreference::load(&storage);
        assert_eq!(theme, ThemePreference::System);

        ThemePreference::Dark.persist(&mut storage);
        assert_eq!(ThemePreference::load(&storage), ThemePreference::Dark);
    }

    #[test]
    fn test_unknown_stored_value_falls_back() {
        let mut storage = MemoryStorage::new();
        storage.save_text(THEME_KEY, "solarized").unwrap();
        assert_eq!(ThemePreference::load(&storage), ThemePreference::System);
    }

    #[test]
    fn test_system_resolution() {
        let system = ThemePreference::System;
        assert_eq!(system.resolve(Some(ResolvedTheme::Dark)), ResolvedTheme::Dark);
        assert_eq!(system.resolve(None), ResolvedTheme::Light);
        assert_eq!(
            ThemePreference::Light.resolve(Some(ResolvedTheme::Dark)),
            ResolvedTheme::Light
        );
    }

    #[test]
    fn test_toggle() {
        assert_eq!(ThemePreference::Dark.toggled(), ThemePreference::Light);
        assert_eq!(ThemePreference::Light.toggled(), ThemePreference::Dark);
        assert_eq!(ThemePreference::System.toggled(), ThemePreference::Dark);
    }

    #[test]
    fn test_round_trip_names() {
        for theme in ThemePreference::ALL {
            assert_eq!(theme.to_string().parse::<ThemePreference>(), Ok(theme));
        }
    }
}
