// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! User tunables. Reference data is compiled in and never configured here.

use crate::leg::LegBounds;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid speed bounds: min {min} km/h, max {max} km/h")]
    InvalidBounds { min: f64, max: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub leg: LegBounds,
}

impl Settings {
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("org", "travelgeo", "travelgeo")
            .map(|dirs| dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("config: loading path={:?}", path);
        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads `path`, or the default location when `None`. A missing file
    /// yields the defaults; a broken one is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if path.exists() {
            Self::from_file(&path)
        } else {
            log::debug!("config: no file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let LegBounds {
            min_speed_kmh: min,
            max_speed_kmh: max,
            ..
        } = self.leg;
        if !(min > 0.0 && max > min) {
            return Err(ConfigError::InvalidBounds { min, max });
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
