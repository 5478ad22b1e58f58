//! Centralized error types for Christmas Adventures.
//!
//! This module defines all error types used throughout the application,
//! providing a consistent error handling approach.

use std::io;
use std::path::PathBuf;

use bevy_ecs::event::Event;

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs.
/// It can represent any error that can occur during game operation.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("SDL error: {0}")]
    Sdl(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Errors raised while resolving sprites, sounds, fonts and texts.
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    /// The requested resource does not exist in the asset store.
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    /// The resource exists but could not be decoded.
    #[error("Failed to decode {kind} '{key}': {reason}")]
    Decode {
        kind: &'static str,
        key: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl AssetError {
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        AssetError::NotFound { kind, key: key.into() }
    }

    pub fn decode(kind: &'static str, key: impl Into<String>, reason: impl ToString) -> Self {
        AssetError::Decode {
            kind,
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if this error means the resource is absent (as opposed to broken).
    pub fn is_not_found(&self) -> bool {
        matches!(self, AssetError::NotFound { .. })
    }
}

/// Errors raised while loading or saving the settings file.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("Could not read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid setting '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Could not write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;

/// Converts SDL's stringly-typed errors into [`GameError::Sdl`].
pub trait SdlResultExt<T> {
    fn sdl_context(self, context: &str) -> GameResult<T>;
}

impl<T, E: ToString> SdlResultExt<T> for Result<T, E> {
    fn sdl_context(self, context: &str) -> GameResult<T> {
        self.map_err(|e| GameError::Sdl(format!("{context}: {}", e.to_string())))
    }
}
