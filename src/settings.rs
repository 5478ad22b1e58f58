//! The persisted settings file.
//!
//! Settings live in a single TOML section and are loaded once at startup. Every component that
//! needs them receives a reference (or the derived [`PhysicsConfig`]); nothing re-reads the file
//! mid-session except through [`SettingsStore::load`] and [`SettingsStore::save`].

use std::fs;
use std::path::{Path, PathBuf};

use bevy_ecs::resource::Resource;
use glam::UVec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::{DEFAULT_FPS, DEFAULT_SKIN, DEFAULT_WINDOW_SIZE};
use crate::error::SettingsError;

/// The TOML table holding every setting.
pub const SECTION: &str = "christmas_adventures";

/// Every persisted setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub fps: u32,
    pub window_size: [u32; 2],
    pub skin: String,
    pub gravity: f32,
    pub step: i32,
    pub jump_power: i32,
    pub number_of_games: u32,
    pub visited_github: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            window_size: DEFAULT_WINDOW_SIZE.to_array(),
            skin: DEFAULT_SKIN.to_string(),
            gravity: 0.5,
            step: 4,
            jump_power: 11,
            number_of_games: 0,
            visited_github: false,
        }
    }
}

impl Settings {
    pub fn window_size(&self) -> UVec2 {
        UVec2::from_array(self.window_size)
    }

    pub fn physics(&self) -> PhysicsConfig {
        PhysicsConfig {
            gravity: self.gravity,
            step: self.step,
            jump_power: self.jump_power,
        }
    }

    /// Rejects values that would make the game unplayable instead of silently patching them.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.fps == 0 {
            return Err(SettingsError::Invalid {
                key: "fps",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.window_size.contains(&0) {
            return Err(SettingsError::Invalid {
                key: "window_size",
                reason: format!("{:?} has a zero dimension", self.window_size),
            });
        }
        if self.skin.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: "skin",
                reason: "must not be empty".to_string(),
            });
        }
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return Err(SettingsError::Invalid {
                key: "gravity",
                reason: format!("{} is not a positive number", self.gravity),
            });
        }
        if self.step <= 0 {
            return Err(SettingsError::Invalid {
                key: "step",
                reason: format!("{} is not positive", self.step),
            });
        }
        if self.jump_power <= 0 {
            return Err(SettingsError::Invalid {
                key: "jump_power",
                reason: format!("{} is not positive", self.jump_power),
            });
        }
        Ok(())
    }

    /// Applies a partial update in memory, mirroring what [`SettingsStore::save`] writes.
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(fps) = update.fps {
            self.fps = fps;
        }
        if let Some(window_size) = update.window_size {
            self.window_size = window_size;
        }
        if let Some(skin) = &update.skin {
            self.skin = skin.clone();
        }
        if let Some(gravity) = update.gravity {
            self.gravity = gravity;
        }
        if let Some(step) = update.step {
            self.step = step;
        }
        if let Some(jump_power) = update.jump_power {
            self.jump_power = jump_power;
        }
        if let Some(number_of_games) = update.number_of_games {
            self.number_of_games = number_of_games;
        }
        if let Some(visited_github) = update.visited_github {
            self.visited_github = visited_github;
        }
    }
}

/// The constants driving player physics.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    /// Added to the vertical velocity every airborne tick.
    pub gravity: f32,
    /// Horizontal speed, in pixels per tick.
    pub step: i32,
    /// Upward speed given by a jump, in pixels per tick.
    pub jump_power: i32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Settings::default().physics()
    }
}

/// A partial settings update. Only the `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_size: Option<[u32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jump_power: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_games: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visited_github: Option<bool>,
}

impl SettingsUpdate {
    pub fn skin(skin: impl Into<String>) -> Self {
        Self {
            skin: Some(skin.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    christmas_adventures: Settings,
}

/// Reads and writes the settings file at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and validates the settings file.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| SettingsError::Read {
            path: self.path.clone(),
            source,
        })?;
        let file: SettingsFile = toml::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })?;

        file.christmas_adventures.validate()?;
        debug!(path = %self.path.display(), "Loaded settings");
        Ok(file.christmas_adventures)
    }

    /// Loads the settings file, writing the defaults first if it does not exist yet.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_create(&self) -> Result<Settings, SettingsError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "No settings file found, writing defaults");
            self.write(&Settings::default())?;
        }
        self.load()
    }

    /// Writes every field of `settings`, replacing the section.
    pub fn write(&self, settings: &Settings) -> Result<(), SettingsError> {
        let mut document = toml::Table::new();
        document.insert(SECTION.to_string(), toml::Value::try_from(settings)?);
        self.write_document(&document)
    }

    /// Merges `update` into the file. Keys not present in `update` are left exactly as they were.
    pub fn save(&self, update: &SettingsUpdate) -> Result<(), SettingsError> {
        let mut document = match fs::read_to_string(&self.path) {
            Ok(contents) => contents.parse::<toml::Table>().map_err(|source| SettingsError::Parse {
                path: self.path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => toml::Table::new(),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let toml::Value::Table(changes) = toml::Value::try_from(update)? else {
            return Err(SettingsError::Invalid {
                key: "update",
                reason: "did not serialize to a table".to_string(),
            });
        };

        let section = document
            .entry(SECTION.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        let toml::Value::Table(section) = section else {
            return Err(SettingsError::Invalid {
                key: SECTION,
                reason: "is not a table".to_string(),
            });
        };

        for (key, value) in changes {
            debug!(key, %value, "Saving setting");
            section.insert(key, value);
        }

        self.write_document(&document)
    }

    fn write_document(&self, document: &toml::Table) -> Result<(), SettingsError> {
        let contents = toml::to_string_pretty(document)?;
        fs::write(&self.path, contents).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
