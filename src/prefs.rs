//! The one persisted preference: how many colours to extract from an image.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::MAXIMUM_PALETTE_COLORS;
use crate::pipeline::extract::DEFAULT_EXTRACT_COUNT;

const APP_DIR: &str = "tps-palettes";
const FILE_NAME: &str = "preferences.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub extract_count: Option<u32>,
}

impl Preferences {
    /// Load from the default location. Missing or unreadable files give defaults.
    pub fn load() -> Self {
        Self::load_from(&preferences_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    debug!(path = %path.display(), error = %e, "failed to read preferences");
                }
                return Self::default();
            }
        };
        toml::from_str(&data).unwrap_or_else(|e| {
            debug!(path = %path.display(), error = %e, "ignoring unparsable preferences");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&preferences_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let data = toml::to_string_pretty(self).context("failed to serialize preferences")?;
        std::fs::write(path, data)
            .with_context(|| format!("failed to write preferences to {}", path.display()))?;
        Ok(())
    }

    /// The saved extraction count, if present and within 1..=20.
    pub fn saved_extract_count(&self) -> Option<usize> {
        let count = usize::try_from(self.extract_count?).ok()?;
        (1..=MAXIMUM_PALETTE_COLORS).contains(&count).then_some(count)
    }

    /// The count to use: the saved one or the default.
    pub fn extract_count(&self) -> usize {
        self.saved_extract_count().unwrap_or(DEFAULT_EXTRACT_COUNT)
    }

    pub fn set_extract_count(&mut self, count: usize) {
        self.extract_count = u32::try_from(count).ok();
    }
}

/// Directory holding this application's configuration.
pub fn config_dir() -> PathBuf {
    let config_home = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    config_home.join(APP_DIR)
}

pub fn preferences_path() -> PathBuf {
    config_dir().join(FILE_NAME)
}
