use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::config::project_dirs;

pub const LAST_CITY_KEY: &str = "last_city";

/// Small string key/value store kept next to the user's data.
#[derive(Debug, Clone)]
pub struct Settings {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    values: BTreeMap<String, String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(Self::settings_file_path()?)
    }

    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self { path, values: BTreeMap::new() });
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let file: SettingsFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        Ok(Self { path, values: file.values })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let file = SettingsFile { values: self.values.clone() };
        let toml = toml::to_string_pretty(&file).context("Failed to serialize settings to TOML")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write settings file: {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn last_city(&self) -> Option<&str> {
        self.get(LAST_CITY_KEY).filter(|city| !city.trim().is_empty())
    }

    /// Blank names are ignored.
    pub fn set_last_city(&mut self, city: &str) {
        let city = city.trim();
        if !city.is_empty() {
            self.set(LAST_CITY_KEY, city);
        }
    }

    pub fn settings_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().join("settings.toml"))
    }
}
